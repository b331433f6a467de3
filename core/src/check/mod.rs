//! The individual lint passes.
//!
//! Each pass is a pure function of one document snapshot. They share the
//! masked views computed once per run but never share mutable state, so any
//! pass can be disabled without affecting the others.

mod brackets;
mod builtins;
mod constructs;
mod keywords;
mod shapes;
mod strings;
mod terminators;
mod usage;

#[cfg(test)]
mod checks_test;

pub use brackets::{BracketCheck, find_bracket_issues};
pub use builtins::{BuiltinPrefixCheck, find_unprefixed_builtins};
pub use constructs::{ConstructCheck, find_incomplete_constructs};
pub use keywords::{KeywordMarkerCheck, find_missing_markers};
pub use shapes::{DictionaryCheck, TypeTagCheck, find_dictionary_issues, find_type_tag_issues};
pub use strings::{StringCheck, find_unterminated_strings};
pub use terminators::{TerminatorCheck, find_missing_terminators};
pub use usage::{DeclaredNameSet, UsageCheck, find_undeclared};

use crate::config::LintConfig;
use crate::diag::Finding;
use crate::text::{MaskedText, SourceText};

/// Everything a pass may look at during one run.
pub struct CheckContext<'a> {
    pub source: &'a SourceText,
    pub masked: &'a MaskedText,
    pub config: &'a LintConfig,
}

impl<'a> CheckContext<'a> {
    pub fn text(&self) -> &'a str {
        self.source.as_str()
    }

    /// Source with string payloads and comment bodies blanked.
    pub fn code(&self) -> &'a str {
        self.masked.code()
    }
}

pub trait Check: Send + Sync {
    /// Name used to disable the pass from configuration.
    fn name(&self) -> &'static str;

    fn run(&self, cx: &CheckContext<'_>, out: &mut Vec<Finding>);
}

/// All passes in reporting order.
pub fn default_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(BracketCheck),
        Box::new(KeywordMarkerCheck),
        Box::new(StringCheck),
        Box::new(BuiltinPrefixCheck),
        Box::new(UsageCheck),
        Box::new(TypeTagCheck),
        Box::new(DictionaryCheck),
        Box::new(ConstructCheck),
        Box::new(TerminatorCheck),
    ]
}

pub fn check_names() -> Vec<&'static str> {
    default_checks().iter().map(|c| c.name()).collect()
}
