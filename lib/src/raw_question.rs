use indexmap::IndexMap;

use crate::path;
use crate::text::clean;
use crate::tree::Node;

#[derive(Clone, Debug, Default)]
pub struct Block {
    pub text: String,
    pub ident: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Choice {
    pub ident: String,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct SubQuestion {
    pub ident: String,
    pub text: String,
    pub choices: IndexMap<String, Choice>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum RespIdent {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

#[derive(Clone, Debug, Default)]
pub struct Response {
    pub title: String,
    pub ident: Vec<String>,
    pub respident: RespIdent,
    // Matching only: the identifier of the choice the subquestion pairs with.
    pub correct: String,
    pub feedback: Option<String>,
    pub mark: Option<f64>,
    pub minvalue: Vec<String>,
    pub maxvalue: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Feedback {
    pub ident: String,
    pub text: String,
}

#[derive(Clone, Debug, Default)]
pub enum ChoiceSet {
    #[default]
    None,
    Flat(IndexMap<String, Choice>),
    Blanks(IndexMap<String, IndexMap<String, Choice>>),
    SubQuestions(Vec<SubQuestion>),
}

#[derive(Clone, Debug, Default)]
pub struct RawQuestion {
    pub qtype: String,
    pub id: String,
    pub title: String,
    pub default_mark: f64,
    pub question: Block,
    pub choices: ChoiceSet,
    pub responses: Vec<Response>,
    pub feedback: IndexMap<String, Feedback>,
    pub max_mark: f64,
    pub min_mark: f64,
    pub var_name: String,
}

pub fn create_raw_question(item: &Node) -> RawQuestion {
    let mut raw = RawQuestion::default();

    let meta = item.nodes_at(path![
        "#",
        "itemmetadata",
        0,
        "#",
        "qtimetadata",
        0,
        "#",
        "qtimetadatafield"
    ]);
    raw.qtype = find_metadata(meta, "question_type").unwrap_or_default();
    raw.default_mark = find_metadata(meta, "points_possible")
        .and_then(|points| points.trim().parse().ok())
        .unwrap_or(1.0);
    raw.title = clean(item.text_at(path!["@", "title"]));
    raw.id = item.text_at(path!["@", "ident"]).to_string();

    for pblock in item.nodes_at(path!["#", "presentation"]) {
        let mut block = Block::default();
        process_block(pblock, &mut block);
        raw.question = block;

        match raw.qtype.as_str() {
            "multiple_choice_question" | "multiple_answers_question" | "true_false_question" => {
                let labels = pblock.nodes_at(path![
                    "#",
                    "response_lid",
                    0,
                    "#",
                    "render_choice",
                    0,
                    "#",
                    "response_label"
                ]);
                raw.choices = ChoiceSet::Flat(process_choices(labels));
            }
            "fill_in_multiple_blanks_question" | "multiple_dropdowns_question" => {
                let mut blanks = IndexMap::new();
                for part in pblock.nodes_at(path!["#", "response_lid"]) {
                    let mut label = Block::default();
                    process_block(part, &mut label);
                    let choices = process_choices(
                        part.nodes_at(path!["#", "render_choice", 0, "#", "response_label"]),
                    );
                    blanks.insert(label.text, choices);
                }
                raw.choices = ChoiceSet::Blanks(blanks);
            }
            "matching_question" => {
                let subquestions =
                    process_subquestions(pblock.nodes_at(path!["#", "response_lid"]));
                raw.choices = ChoiceSet::SubQuestions(subquestions);
            }
            _ => {}
        }
    }

    if !matches!(
        raw.qtype.as_str(),
        "text_only_question" | "essay_question" | "file_upload_question"
    ) {
        if let Some(resprocessing) = item.nodes_at(path!["#", "resprocessing"]).first() {
            raw.max_mark = resprocessing
                .text_at(path!["#", "outcomes", 0, "#", "decvar", 0, "@", "maxvalue"])
                .parse()
                .unwrap_or(0.0);
            raw.min_mark = resprocessing
                .text_at(path!["#", "outcomes", 0, "#", "decvar", 0, "@", "minvalue"])
                .parse()
                .unwrap_or(0.0);
            raw.var_name = resprocessing
                .text_at(path!["#", "outcomes", 0, "#", "decvar", 0, "@", "varname"])
                .to_string();

            let conditions = resprocessing.nodes_at(path!["#", "respcondition"]);
            raw.responses = response_processor_for(&raw.qtype).process(conditions);
        }
    }

    for node in item.nodes_at(path!["#", "itemfeedback"]) {
        let feedback = process_feedback(node);
        // Last write wins on duplicate feedback identifiers.
        raw.feedback.insert(feedback.ident.clone(), feedback);
    }

    raw
}

fn find_metadata(fields: &[Node], label: &str) -> Option<String> {
    fields
        .iter()
        .find(|field| field.text_at(path!["#", "fieldlabel", 0, "#"]) == label)
        .map(|field| field.text_at(path!["#", "fieldentry", 0, "#"]).to_string())
}

pub fn process_block(node: &Node, block: &mut Block) {
    if node.has(path!["#", "material", 0, "#", "mattext"]) {
        block
            .text
            .push_str(node.text_at(path!["#", "material", 0, "#", "mattext", 0, "#"]));
    } else if node.has(path![
        "#",
        "material",
        0,
        "#",
        "mat_extension",
        0,
        "#",
        "mat_formattedtext"
    ]) {
        block.text.push_str(node.text_at(path![
            "#",
            "material",
            0,
            "#",
            "mat_extension",
            0,
            "#",
            "mat_formattedtext",
            0,
            "#"
        ]));
    } else if node.has(path!["#", "response_label"]) {
        if let Some(label) = node.nodes_at(path!["#", "response_label"]).first() {
            if block.ident.is_none() {
                let ident = label.text_at(path!["@", "ident"]);
                if !ident.is_empty() {
                    block.ident = Some(ident.to_string());
                }
            }
            for flow in label.nodes_at(path!["#", "flow_mat"]) {
                process_block(flow, block);
            }
        }
    } else {
        let flows = if node.has(path!["#", "flow_mat"]) {
            node.nodes_at(path!["#", "flow_mat"])
        } else {
            node.nodes_at(path!["#", "flow"])
        };
        for flow in flows {
            process_block(flow, block);
        }
    }
}

pub fn process_choices(labels: &[Node]) -> IndexMap<String, Choice> {
    let mut choices = IndexMap::new();
    for label in labels {
        let ident = label.text_at(path!["@", "ident"]).to_string();
        let mut block = Block::default();
        if let Some(flow) = label.nodes_at(path!["#", "flow_mat"]).first() {
            process_block(flow, &mut block);
        } else {
            process_block(label, &mut block);
        }

        choices.insert(
            ident.clone(),
            Choice {
                ident,
                text: block.text,
            },
        );
    }
    choices
}

pub fn process_subquestions(parts: &[Node]) -> Vec<SubQuestion> {
    parts
        .iter()
        .map(|part| {
            let ident = part.text_at(path!["@", "ident"]).to_string();
            let mut block = Block::default();
            process_block(part, &mut block);
            let choices = process_choices(
                part.nodes_at(path!["#", "render_choice", 0, "#", "response_label"]),
            );

            SubQuestion {
                ident,
                text: block.text,
                choices,
            }
        })
        .collect()
}

fn process_feedback(node: &Node) -> Feedback {
    let ident = node.text_at(path!["@", "ident"]).to_string();
    let mut block = Block::default();
    if let Some(flow) = node.nodes_at(path!["#", "flow_mat"]).first() {
        process_block(flow, &mut block);
    } else if let Some(flow) = node
        .nodes_at(path![
            "#",
            "solution",
            0,
            "#",
            "solutionmaterial",
            0,
            "#",
            "flow_mat"
        ])
        .first()
    {
        process_block(flow, &mut block);
    }

    Feedback {
        ident,
        text: block.text,
    }
}

pub trait ResponseProcessor {
    fn process(&self, conditions: &[Node]) -> Vec<Response>;
}

pub fn response_processor_for(qtype: &str) -> &'static dyn ResponseProcessor {
    match qtype {
        "matching_question" => &MatchingResponses,
        "numerical_question" => &NumericalResponses,
        _ => &GenericResponses,
    }
}

pub struct GenericResponses;
pub struct MatchingResponses;
pub struct NumericalResponses;

fn condition_title(condition: &Node) -> String {
    let title = condition.text_at(path!["@", "title"]);
    if !title.is_empty() {
        title.to_string()
    } else {
        condition
            .text_at(path!["#", "displayfeedback", 0, "@", "linkrefid"])
            .to_string()
    }
}

fn condition_feedback(condition: &Node) -> Option<String> {
    let linkrefid = condition.text_at(path!["#", "displayfeedback", 0, "@", "linkrefid"]);
    if linkrefid.is_empty() {
        None
    } else {
        Some(linkrefid.to_string())
    }
}

// A positive mark is the sole signal that a condition awards credit; the
// title is overwritten from its sign whenever a set-value is present.
fn apply_mark(condition: &Node, response: &mut Response) {
    if condition.has(path!["#", "setvar", 0, "#"]) {
        let mark: f64 = condition
            .text_at(path!["#", "setvar", 0, "#"])
            .trim()
            .parse()
            .unwrap_or(0.0);
        response.mark = Some(mark);
        response.title = if mark > 0.0 { "correct" } else { "incorrect" }.to_string();
    }
}

impl ResponseProcessor for GenericResponses {
    fn process(&self, conditions: &[Node]) -> Vec<Response> {
        let mut responses = Vec::new();
        for condition in conditions {
            let mut response = Response {
                title: condition_title(condition),
                ..Response::default()
            };

            if condition.has(path!["#", "conditionvar", 0, "#", "other", 0, "#"]) {
                response.ident.push(
                    condition
                        .text_at(path!["#", "conditionvar", 0, "#", "other", 0, "#"])
                        .to_string(),
                );
            } else if condition.has(path!["#", "conditionvar", 0, "#", "and"]) {
                let children =
                    condition.children_at(path!["#", "conditionvar", 0, "#", "and", 0, "#"]);
                for (tag, nodes) in children.into_iter().flatten() {
                    if tag == "varequal" {
                        for node in nodes {
                            response.ident.push(node.text_at(path!["#"]).to_string());
                        }
                    }
                    if response.respident == RespIdent::None {
                        if let Some(node) =
                            nodes.iter().find(|node| !node.attr("respident").is_empty())
                        {
                            response.respident =
                                RespIdent::One(node.attr("respident").to_string());
                        }
                    }
                }
            } else {
                let mut respidents = Vec::new();
                for conditionvar in condition.nodes_at(path!["#", "conditionvar"]) {
                    for varequal in conditionvar.nodes_at(path!["#", "varequal"]) {
                        response.ident.push(varequal.text_at(path!["#"]).to_string());
                        respidents.push(varequal.attr("respident").to_string());
                    }
                }
                if !respidents.is_empty() {
                    response.respident = RespIdent::Many(respidents);
                }
            }

            response.feedback = condition_feedback(condition);
            apply_mark(condition, &mut response);
            responses.push(response);
        }
        responses
    }
}

impl ResponseProcessor for MatchingResponses {
    fn process(&self, conditions: &[Node]) -> Vec<Response> {
        conditions
            .iter()
            .map(|condition| {
                let mut response = Response::default();
                if condition.has(path!["#", "conditionvar", 0, "#", "varequal"]) {
                    response.correct = condition
                        .text_at(path!["#", "conditionvar", 0, "#", "varequal", 0, "#"])
                        .to_string();
                    let respident = condition.text_at(path![
                        "#",
                        "conditionvar",
                        0,
                        "#",
                        "varequal",
                        0,
                        "@",
                        "respident"
                    ]);
                    response.respident = RespIdent::One(respident.to_string());
                }
                // Conditions without an equality test stay inert but are
                // still appended.
                response
            })
            .collect()
    }
}

impl ResponseProcessor for NumericalResponses {
    fn process(&self, conditions: &[Node]) -> Vec<Response> {
        let mut responses = Vec::new();
        for condition in conditions {
            let mut response = Response {
                title: condition_title(condition),
                ..Response::default()
            };

            if condition.has(path!["#", "conditionvar", 0, "#", "other", 0, "#"]) {
                response.ident.push(
                    condition
                        .text_at(path!["#", "conditionvar", 0, "#", "other", 0, "#"])
                        .to_string(),
                );
            } else if condition.has(path!["#", "conditionvar", 0, "#", "or"]) {
                let children =
                    condition.children_at(path!["#", "conditionvar", 0, "#", "or", 0, "#"]);
                for (tag, nodes) in children.into_iter().flatten() {
                    if tag == "and" {
                        let limits = nodes.first().and_then(Node::children);
                        collect_bounds(limits, &mut response);
                    }
                }
            } else {
                let limits = condition.children_at(path!["#", "conditionvar", 0, "#"]);
                collect_bounds(limits, &mut response);
            }

            response.feedback = condition_feedback(condition);
            apply_mark(condition, &mut response);
            responses.push(response);
        }
        responses
    }
}

fn collect_bounds(
    limits: Option<&indexmap::IndexMap<String, Vec<Node>>>,
    response: &mut Response,
) {
    for (tag, nodes) in limits.into_iter().flatten() {
        let bound = nodes
            .first()
            .map(|node| node.text_at(path!["#"]))
            .unwrap_or("")
            .to_string();
        match tag.as_str() {
            "varlte" => response.maxvalue.push(bound),
            "vargte" => response.minvalue.push(bound),
            _ => {}
        }
    }
}
