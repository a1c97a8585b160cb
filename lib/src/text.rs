pub fn clean(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\u{0}', "")
        .trim()
        .to_string()
}

pub fn html_to_text(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut in_tag = false;
    for character in text.chars() {
        match character {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            character if !in_tag => stripped.push(character),
            _ => {}
        }
    }

    stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

// Control characters of the embedded-answer (cloze) syntax.
pub fn escape_cloze(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        if matches!(character, '}' | '#' | '~' | '/' | '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}

pub fn default_question_name(question_text: &str, id: &str) -> String {
    let stripped = html_to_text(question_text);
    if stripped.is_empty() {
        format!("Imported question {id}")
    } else {
        stripped.chars().take(80).collect()
    }
}
