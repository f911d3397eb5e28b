use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::error::{Error, ErrorKind};

/// Entry category, as understood by Dash/Zeal.
///
/// Only decides the icon and grouping in the documentation browser; the
/// string form is what gets stored in the index `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    /// A library function (`lib.strings.concatStrings`).
    Function,
    /// A library namespace (`lib.strings`).
    Environment,
    /// A manual chapter.
    Section,
    /// An entry nested below a manual chapter.
    Guide,
    /// A NixOS configuration option.
    Option,
}
impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Function => "Function",
            Kind::Environment => "Environment",
            Kind::Section => "Section",
            Kind::Guide => "Guide",
            Kind::Option => "Option",
        }
    }
}
impl FromStr for Kind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "function" => Self::Function,
            "environment" => Self::Environment,
            "section" => Self::Section,
            "guide" => Self::Guide,
            "option" => Self::Option,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "kind",
                value: s.to_string(),
            }),
        })
    }
}
impl TryFrom<String> for Kind {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
