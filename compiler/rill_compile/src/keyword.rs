//! Reserved heads of special forms and operators.

use rill_ir::{BinaryOp, UnaryOp};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Keyword {
    Function,
    Set,
    Define,
    Const,
    Loop,
    Break,
    Continue,
    If,
    Unless,
    Switch,
    Jump,
    Return,
    /// `+ - * / == != < <= > >= && || $`
    Binary(BinaryOp),
    /// `!`
    Not,
    /// `++` and `--`
    Step(UnaryOp),
    /// `+= -= *= /= &&= ||= $=`
    Compound(BinaryOp),
}

impl Keyword {
    pub fn from_name(name: &str) -> Option<Keyword> {
        let keyword = match name {
            "function" => Keyword::Function,
            "set" => Keyword::Set,
            "define" => Keyword::Define,
            "const" => Keyword::Const,
            "loop" => Keyword::Loop,
            "break" => Keyword::Break,
            "continue" => Keyword::Continue,
            "if" => Keyword::If,
            "unless" => Keyword::Unless,
            "switch" => Keyword::Switch,
            "jump" => Keyword::Jump,
            "return" => Keyword::Return,
            "!" => Keyword::Not,
            "++" => Keyword::Step(UnaryOp::Inc),
            "--" => Keyword::Step(UnaryOp::Dec),
            "+=" | "-=" | "*=" | "/=" | "&&=" | "||=" | "$=" => {
                Keyword::Compound(BinaryOp::from_symbol(name.strip_suffix('=')?)?)
            }
            _ => Keyword::Binary(BinaryOp::from_symbol(name)?),
        };
        Some(keyword)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Function => "function",
            Keyword::Set => "set",
            Keyword::Define => "define",
            Keyword::Const => "const",
            Keyword::Loop => "loop",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::If => "if",
            Keyword::Unless => "unless",
            Keyword::Switch => "switch",
            Keyword::Jump => "jump",
            Keyword::Return => "return",
            Keyword::Not => "!",
            Keyword::Step(op) => op.as_symbol(),
            Keyword::Binary(op) => op.as_symbol(),
            Keyword::Compound(op) => match op {
                BinaryOp::Add => "+=",
                BinaryOp::Sub => "-=",
                BinaryOp::Mul => "*=",
                BinaryOp::Div => "/=",
                BinaryOp::And => "&&=",
                BinaryOp::Or => "||=",
                _ => "$=",
            },
        }
    }
}
