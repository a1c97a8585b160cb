use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use crate::encode;
use crate::path;
use crate::question::Question;
use crate::raw_question::{create_raw_question, RawQuestion};
use crate::tree::Node;
use crate::xml;

#[derive(Clone, Debug)]
pub struct Options {
    pub locale: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct Diagnostic {
    pub message: String,
    pub context: Option<String>,
}

#[derive(Serialize, Clone, Debug, Default)]
pub struct Conversion {
    pub questions: Vec<Question>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Conversion {
    fn report(&mut self, message: String, context: Option<String>) {
        warn!(%message, ?context, "item skipped");
        self.diagnostics.push(Diagnostic { message, context });
    }
}

pub fn convert(document: &str, options: &Options) -> Result<Conversion> {
    let tree = xml::parse_document(document)?;
    Ok(convert_tree(&tree, options))
}

pub fn convert_tree(tree: &Node, options: &Options) -> Conversion {
    let mut conversion = Conversion::default();

    let items = tree.nodes_at(path![
        "#",
        "questestinterop",
        0,
        "#",
        "assessment",
        0,
        "#",
        "section",
        0,
        "#",
        "item"
    ]);
    for item in items {
        let raw = create_raw_question(item);
        process_item(&raw, options, &mut conversion);
    }

    conversion
}

fn process_item(raw: &RawQuestion, options: &Options, conversion: &mut Conversion) {
    let questions = &mut conversion.questions;
    match raw.qtype.as_str() {
        "multiple_choice_question" => questions.push(encode::process_multichoice(raw, true)),
        "multiple_answers_question" => questions.push(encode::process_multichoice(raw, false)),
        "true_false_question" => questions.push(encode::process_truefalse(raw, &options.locale)),
        "short_answer_question" => questions.push(encode::process_shortanswer(raw)),
        "essay_question" | "file_upload_question" => questions.push(encode::process_essay(raw)),
        "matching_question" => match encode::process_matching(raw) {
            Ok(question) => questions.push(question),
            Err(error) => conversion.report(error.to_string(), Some(raw.id.clone())),
        },
        "multiple_dropdowns_question" | "fill_in_multiple_blanks_question" => {
            questions.push(encode::process_multiple(raw));
        }
        "numerical_question" => questions.push(encode::process_numerical(raw)),
        "text_only_question" => questions.push(encode::process_description(raw)),
        "calculated_question" => conversion.report(
            "calculated question skipped: calculated questions are not supported".to_string(),
            Some(raw.id.clone()),
        ),
        other => conversion.report(
            format!("unknown or unhandled question type '{other}'"),
            Some(raw.id.clone()),
        ),
    }
}
