use serde::Serialize;

pub const FORMAT_HTML: &str = "html";

#[derive(Serialize, Clone, Debug)]
pub struct QuestionCommon {
    pub name: String,
    pub questiontext: String,
    pub questiontextformat: String,
    pub generalfeedback: String,
    pub defaultmark: f64,
}

impl QuestionCommon {
    pub fn new(name: String, questiontext: String) -> Self {
        Self {
            name,
            questiontext,
            questiontextformat: FORMAT_HTML.to_string(),
            generalfeedback: String::new(),
            defaultmark: 1.0,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(tag = "qtype")]
pub enum Question {
    #[serde(rename = "multichoice")]
    Multichoice(MultichoiceQuestion),
    #[serde(rename = "truefalse")]
    TrueFalse(TrueFalseQuestion),
    #[serde(rename = "shortanswer")]
    ShortAnswer(ShortAnswerQuestion),
    #[serde(rename = "match")]
    Matching(MatchingQuestion),
    #[serde(rename = "numerical")]
    Numerical(NumericalQuestion),
    #[serde(rename = "multianswer")]
    Multianswer(MultianswerQuestion),
    #[serde(rename = "essay")]
    Essay(EssayQuestion),
    #[serde(rename = "description")]
    Description(DescriptionQuestion),
}

impl Question {
    pub fn name(&self) -> &str {
        &self.common().name
    }

    pub fn common(&self) -> &QuestionCommon {
        match self {
            Question::Multichoice(question) => &question.common,
            Question::TrueFalse(question) => &question.common,
            Question::ShortAnswer(question) => &question.common,
            Question::Matching(question) => &question.common,
            Question::Numerical(question) => &question.common,
            Question::Multianswer(question) => &question.common,
            Question::Essay(question) => &question.common,
            Question::Description(question) => &question.common,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct MultichoiceQuestion {
    #[serde(flatten)]
    pub common: QuestionCommon,
    pub single: bool,
    pub answer: Vec<String>,
    pub fraction: Vec<f64>,
    pub feedback: Vec<String>,
    pub correctfeedback: String,
    pub incorrectfeedback: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct TrueFalseQuestion {
    #[serde(flatten)]
    pub common: QuestionCommon,
    pub answer: bool,
    pub penalty: f64,
    pub feedbacktrue: String,
    pub feedbackfalse: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct ShortAnswerQuestion {
    #[serde(flatten)]
    pub common: QuestionCommon,
    pub usecase: bool,
    pub answer: Vec<String>,
    pub fraction: Vec<f64>,
    pub feedback: Vec<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct MatchingQuestion {
    #[serde(flatten)]
    pub common: QuestionCommon,
    pub subquestions: Vec<String>,
    pub subanswers: Vec<String>,
    pub correctfeedback: String,
    pub incorrectfeedback: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct NumericalQuestion {
    #[serde(flatten)]
    pub common: QuestionCommon,
    pub answer: Vec<f64>,
    pub tolerance: Vec<f64>,
    pub fraction: Vec<f64>,
    pub feedback: Vec<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct MultianswerQuestion {
    #[serde(flatten)]
    pub common: QuestionCommon,
    pub penalty: f64,
    pub length: u32,
}

#[derive(Serialize, Clone, Debug)]
pub struct EssayQuestion {
    #[serde(flatten)]
    pub common: QuestionCommon,
    pub attachments: u32,
    pub attachmentsrequired: u32,
    pub responserequired: bool,
    pub responseformat: String,
    pub responsefieldlines: u32,
    pub graderinfo: String,
    pub responsetemplate: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct DescriptionQuestion {
    #[serde(flatten)]
    pub common: QuestionCommon,
    pub length: u32,
}
