use indexmap::IndexMap;

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub attrs: IndexMap<String, String>,
    pub content: Content,
}

#[derive(Clone, Debug, Default)]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Children(IndexMap<String, Vec<Node>>),
}

#[derive(Clone, Copy, Debug)]
pub enum Value<'a> {
    Node(&'a Node),
    Seq(&'a [Node]),
    Map(&'a IndexMap<String, Vec<Node>>),
    Attrs(&'a IndexMap<String, String>),
    Text(&'a str),
}

#[derive(Clone, Copy, Debug)]
pub enum Step<'a> {
    Children,
    Attrs,
    Tag(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for Step<'a> {
    fn from(key: &'a str) -> Self {
        match key {
            "#" => Step::Children,
            "@" => Step::Attrs,
            tag => Step::Tag(tag),
        }
    }
}

impl From<usize> for Step<'_> {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

#[macro_export]
macro_rules! path {
    ($($step:expr),* $(,)?) => {
        &[$($crate::tree::Step::from($step)),*][..]
    };
}

impl<'a> Value<'a> {
    fn step(self, step: Step) -> Option<Value<'a>> {
        match (self, step) {
            (Value::Node(node), Step::Children) => Some(match &node.content {
                Content::Empty => Value::Text(""),
                Content::Text(text) => Value::Text(text),
                Content::Children(children) => Value::Map(children),
            }),
            (Value::Node(node), Step::Attrs) => Some(Value::Attrs(&node.attrs)),
            (Value::Map(children), Step::Tag(tag)) => {
                children.get(tag).map(|nodes| Value::Seq(nodes))
            }
            (Value::Attrs(attrs), Step::Tag(key)) => {
                attrs.get(key).map(|value| Value::Text(value))
            }
            (Value::Seq(nodes), Step::Index(index)) => nodes.get(index).map(Value::Node),
            _ => None,
        }
    }

    fn is_empty(self) -> bool {
        match self {
            Value::Node(_) => false,
            Value::Seq(nodes) => nodes.is_empty(),
            Value::Map(children) => children.is_empty(),
            Value::Attrs(attrs) => attrs.is_empty(),
            Value::Text(text) => text.is_empty(),
        }
    }
}

pub fn get<'a>(value: Value<'a>, steps: &[Step], flatten: bool) -> Option<Value<'a>> {
    let mut current = value;
    for &step in steps {
        current = current.step(step)?;
    }
    if flatten {
        if let Value::Seq(nodes) = current {
            if nodes.len() == 1 {
                current = Value::Node(&nodes[0]);
            }
        }
    }
    Some(current)
}

impl Node {
    pub fn value(&self) -> Value<'_> {
        Value::Node(self)
    }

    pub fn at<'a>(&'a self, steps: &[Step]) -> Option<Value<'a>> {
        get(self.value(), steps, false)
    }

    pub fn text_at(&self, steps: &[Step]) -> &str {
        match get(self.value(), steps, true) {
            Some(Value::Text(text)) => text,
            Some(Value::Node(node)) => match &node.content {
                Content::Text(text) => text,
                _ => "",
            },
            _ => "",
        }
    }

    pub fn nodes_at(&self, steps: &[Step]) -> &[Node] {
        match self.at(steps) {
            Some(Value::Seq(nodes)) => nodes,
            _ => &[],
        }
    }

    pub fn children_at(&self, steps: &[Step]) -> Option<&IndexMap<String, Vec<Node>>> {
        match self.at(steps) {
            Some(Value::Map(children)) => Some(children),
            _ => None,
        }
    }

    // Mirrors a truthiness probe: an empty string or empty collection at
    // the path counts as absent.
    pub fn has(&self, steps: &[Step]) -> bool {
        self.at(steps).map_or(false, |value| !value.is_empty())
    }

    pub fn children(&self) -> Option<&IndexMap<String, Vec<Node>>> {
        match &self.content {
            Content::Children(children) => Some(children),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> &str {
        self.attrs.get(name).map(String::as_str).unwrap_or("")
    }
}
