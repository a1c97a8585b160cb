use anyhow::{bail, Result};
use indexmap::{IndexMap, IndexSet};

use crate::grade::nearest_grade;
use crate::lang::localized_false;
use crate::question::{
    DescriptionQuestion, EssayQuestion, MatchingQuestion, MultianswerQuestion,
    MultichoiceQuestion, NumericalQuestion, Question, QuestionCommon, ShortAnswerQuestion,
    TrueFalseQuestion,
};
use crate::raw_question::{Choice, ChoiceSet, RawQuestion, RespIdent, Response};
use crate::text::{clean, default_question_name, escape_cloze, html_to_text};

fn process_common(raw: &RawQuestion) -> QuestionCommon {
    let text = clean(&raw.question.text);
    let name = if !raw.title.is_empty() {
        clean(&raw.title)
    } else {
        default_question_name(&text, &raw.id)
    };

    QuestionCommon::new(name, text)
}

fn general_feedback(raw: &RawQuestion, common: &mut QuestionCommon) {
    if let Some(feedback) = raw.feedback.get("general_fb") {
        common.generalfeedback = feedback.text.trim().to_string();
    }
}

fn combined_feedback(raw: &RawQuestion) -> (String, String) {
    let correct = raw
        .feedback
        .get("correct_fb")
        .map(|feedback| feedback.text.trim().to_string())
        .unwrap_or_default();
    let incorrect = raw
        .feedback
        .get("general_incorrect_fb")
        .map(|feedback| feedback.text.trim().to_string())
        .unwrap_or_default();

    (correct, incorrect)
}

fn answer_feedback(raw: &RawQuestion, ident: &str) -> String {
    raw.feedback
        .get(ident)
        .map(|feedback| clean(&feedback.text))
        .unwrap_or_default()
}

fn correct_idents(responses: &[Response]) -> IndexSet<String> {
    let mut idents = IndexSet::new();
    for response in responses {
        if response.title == "correct" {
            for ident in &response.ident {
                idents.insert(ident.clone());
            }
        }
    }
    idents
}


pub fn process_multichoice(raw: &RawQuestion, single: bool) -> Question {
    let mut common = process_common(raw);
    general_feedback(raw, &mut common);
    let (correctfeedback, incorrectfeedback) = combined_feedback(raw);

    let correct = correct_idents(&raw.responses);
    // Each correct choice receives an even split of the full credit,
    // snapped to the nearest legal fraction.
    let split = if single || correct.is_empty() {
        1.0
    } else {
        nearest_grade(1.0 / correct.len() as f64)
    };

    let empty = IndexMap::new();
    let choices = match &raw.choices {
        ChoiceSet::Flat(choices) => choices,
        _ => &empty,
    };

    let mut answer = Vec::new();
    let mut fraction = Vec::new();
    let mut feedback = Vec::new();
    for choice in choices.values() {
        answer.push(clean(&choice.text));
        fraction.push(if correct.contains(&choice.ident) {
            split
        } else {
            0.0
        });
        feedback.push(answer_feedback(raw, &format!("{}_fb", choice.ident)));
    }

    Question::Multichoice(MultichoiceQuestion {
        common,
        single,
        answer,
        fraction,
        feedback,
        correctfeedback,
        incorrectfeedback,
    })
}

pub fn process_truefalse(raw: &RawQuestion, locale: &str) -> Question {
    let mut common = process_common(raw);
    general_feedback(raw, &mut common);

    let empty = IndexMap::new();
    let choices = match &raw.choices {
        ChoiceSet::Flat(choices) => choices,
        _ => &empty,
    };

    let mut correct_ident = String::new();
    let mut incorrect_ident = String::new();
    let mut correct_text = String::new();
    for response in &raw.responses {
        if response.title != "correct" {
            continue;
        }
        if let Some(ident) = response.ident.first() {
            for (cid, choice) in choices {
                if cid == ident {
                    correct_ident = cid.clone();
                    correct_text = choice.text.to_lowercase();
                } else {
                    incorrect_ident = cid.clone();
                }
            }
        }
    }

    let translated = localized_false(locale).to_lowercase();
    let true_is_correct =
        correct_text != "false" && correct_text != "faux" && correct_text != translated;

    let (true_ident, false_ident) = if true_is_correct {
        (correct_ident, incorrect_ident)
    } else {
        (incorrect_ident, correct_ident)
    };

    Question::TrueFalse(TrueFalseQuestion {
        common,
        answer: true_is_correct,
        penalty: 1.0,
        feedbacktrue: answer_feedback(raw, &format!("{true_ident}_fb")),
        feedbackfalse: answer_feedback(raw, &format!("{false_ident}_fb")),
    })
}

pub fn process_shortanswer(raw: &RawQuestion) -> Question {
    let mut common = process_common(raw);
    general_feedback(raw, &mut common);

    let mut answer = Vec::new();
    let mut fraction = Vec::new();
    let mut feedback = Vec::new();
    for response in &raw.responses {
        if response.title != "correct" {
            continue;
        }
        for ident in &response.ident {
            if !ident.is_empty() {
                answer.push(ident.clone());
                fraction.push(1.0);
                feedback.push(String::new());
            }
        }
    }

    // Incorrect conditions restating a correct literal carry its feedback.
    for response in &raw.responses {
        if response.title == "correct" {
            continue;
        }
        for ident in &response.ident {
            if ident.is_empty() {
                continue;
            }
            for (index, collected) in answer.iter().enumerate() {
                if collected == ident {
                    feedback[index] = answer_feedback(raw, &response.title);
                }
            }
        }
    }

    // Catch-all so students still get feedback for answers the author did
    // not anticipate.
    answer.push("*".to_string());
    fraction.push(0.0);
    feedback.push(String::new());

    Question::ShortAnswer(ShortAnswerQuestion {
        common,
        usecase: false,
        answer,
        fraction,
        feedback,
    })
}

pub fn process_matching(raw: &RawQuestion) -> Result<Question> {
    let mut common = process_common(raw);
    general_feedback(raw, &mut common);
    let (correctfeedback, incorrectfeedback) = combined_feedback(raw);

    let parts: &[_] = match &raw.choices {
        ChoiceSet::SubQuestions(parts) => parts,
        _ => &[],
    };

    // Correct answer text per subquestion, plus the deduplicated pool of
    // all choice texts in insertion order.
    let mut correct_texts: IndexMap<String, String> = IndexMap::new();
    let mut all_texts: Vec<String> = Vec::new();
    for part in parts {
        let mut correct = "";
        for response in &raw.responses {
            if let RespIdent::One(respident) = &response.respident {
                if respident == &part.ident {
                    correct = &response.correct;
                }
            }
        }
        let text = part
            .choices
            .get(correct)
            .map(|choice| choice.text.clone())
            .unwrap_or_default();
        correct_texts.insert(part.ident.clone(), text);

        for choice in part.choices.values() {
            if !all_texts.contains(&choice.text) {
                all_texts.push(choice.text.clone());
            }
        }
    }

    let mut subquestions = Vec::new();
    let mut subanswers = Vec::new();
    for text in &all_texts {
        if text.is_empty() {
            continue;
        }
        let subanswer = html_to_text(&clean(text));

        let mut matched = false;
        for (part_ident, correct_text) in &correct_texts {
            if correct_text != text {
                continue;
            }
            let subquestion = parts
                .iter()
                .find(|part| &part.ident == part_ident)
                .map(|part| clean(&part.text))
                .unwrap_or_default();
            subquestions.push(subquestion);
            subanswers.push(subanswer.clone());
            matched = true;
        }
        if !matched {
            // A choice that is nobody's correct answer is a distractor.
            subquestions.push(String::new());
            subanswers.push(subanswer);
        }
    }

    let subquestion_count = subquestions
        .iter()
        .filter(|subquestion| !subquestion.is_empty())
        .count();
    if subquestion_count < 2 || subanswers.len() < 3 {
        bail!(
            "unable to import matching question '{}': a matching question must comprise \
             at least two questions and three answers",
            common.questiontext
        );
    }

    Ok(Question::Matching(MatchingQuestion {
        common,
        subquestions,
        subanswers,
        correctfeedback,
        incorrectfeedback,
    }))
}

pub fn process_numerical(raw: &RawQuestion) -> Question {
    let mut common = process_common(raw);
    general_feedback(raw, &mut common);

    let mut answer = Vec::new();
    let mut tolerance = Vec::new();
    let mut fraction = Vec::new();
    let mut feedback = Vec::new();
    for response in &raw.responses {
        if response.title != "correct" {
            continue;
        }
        let mark = response.mark.unwrap_or(0.0);
        if mark <= 0.0 {
            continue;
        }
        for (index, minvalue) in response.minvalue.iter().enumerate() {
            let min: f64 = minvalue.trim().parse().unwrap_or(0.0);
            let max: f64 = response
                .maxvalue
                .get(index)
                .map(|value| value.trim())
                .unwrap_or("")
                .parse()
                .unwrap_or(0.0);
            let midpoint = (max + min) / 2.0;

            answer.push(midpoint);
            tolerance.push(max - midpoint);
            fraction.push(nearest_grade(mark / 100.0));
            feedback.push(
                response
                    .feedback
                    .as_deref()
                    .map(|ident| answer_feedback(raw, ident))
                    .unwrap_or_default(),
            );
        }
    }

    Question::Numerical(NumericalQuestion {
        common,
        answer,
        tolerance,
        fraction,
        feedback,
    })
}

pub fn process_multiple(raw: &RawQuestion) -> Question {
    let mut text = clean(&raw.question.text);

    let empty = IndexMap::new();
    let blanks = match &raw.choices {
        ChoiceSet::Blanks(blanks) => blanks,
        _ => &empty,
    };
    for (key, choices) in blanks {
        let clause = construct_subquestion(key, choices, &raw.responses, &raw.qtype);
        text = text.replace(&format!("[{key}]"), &clause);
    }

    let name = if !raw.title.is_empty() {
        clean(&raw.title)
    } else {
        default_question_name(&text, &raw.id)
    };
    let mut common = QuestionCommon::new(name, text);
    general_feedback(raw, &mut common);

    Question::Multianswer(MultianswerQuestion {
        common,
        penalty: 0.3333333,
        length: 1,
    })
}

fn construct_subquestion(
    placeholder: &str,
    choices: &IndexMap<String, Choice>,
    responses: &[Response],
    qtype: &str,
) -> String {
    let expected = format!("response_{placeholder}");
    let mut correct: Vec<&str> = Vec::new();
    for response in responses {
        if response.title != "correct" {
            continue;
        }
        match &response.respident {
            RespIdent::One(respident) if respident == &expected => {
                correct.extend(response.ident.iter().map(String::as_str));
            }
            RespIdent::Many(respidents) => {
                for (ident, respident) in response.ident.iter().zip(respidents) {
                    if respident == &expected {
                        correct.push(ident);
                    }
                }
            }
            _ => {}
        }
    }

    // Fill-in-the-blank exports list every accepted spelling as a choice,
    // so all of them are treated as correct regardless of the stated flag.
    let all_correct = qtype == "fill_in_multiple_blanks_question";
    let options: Vec<String> = choices
        .values()
        .map(|choice| {
            let prefix = if all_correct || correct.contains(&choice.ident.as_str()) {
                "%100%"
            } else {
                ""
            };
            format!("{prefix}{}", escape_cloze(&choice.text))
        })
        .collect();

    if qtype == "fill_in_multiple_blanks_question" {
        format!("{{1:SHORTANSWER:{}}}", options.join("~"))
    } else {
        format!("{{1:MULTICHOICE:{}}}", options.join("~"))
    }
}

pub fn process_essay(raw: &RawQuestion) -> Question {
    let common = process_common(raw);
    let upload = raw.qtype == "file_upload_question";

    Question::Essay(EssayQuestion {
        common,
        attachments: if upload { 1 } else { 0 },
        attachmentsrequired: if upload { 1 } else { 0 },
        responserequired: !upload,
        responseformat: "editor".to_string(),
        responsefieldlines: 15,
        graderinfo: String::new(),
        responsetemplate: String::new(),
    })
}

pub fn process_description(raw: &RawQuestion) -> Question {
    let mut common = process_common(raw);
    common.defaultmark = 0.0;

    Question::Description(DescriptionQuestion { common, length: 0 })
}
