//! Terminal prompt for choosing between several customizations.

use std::io;

use cliclack::{input, intro, note, outro};
use console::style;

use crate::resolver::ChoicePrompt;
use crate::speech::CustomizationKind;

/// Interactive `ChoicePrompt` backed by cliclack.
///
/// Lists the customizations in a note and reads the id on one line. The answer
/// is returned exactly as typed.
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ChoicePrompt for ConsolePrompt {
    fn choose(&mut self, kind: CustomizationKind, choices: &[String]) -> io::Result<String> {
        tracing::debug!("Prompting for one of {} {}s", choices.len(), kind.name());

        intro(style(" select customization ").on_white().black())?;
        note(
            format!("{} {}s available", choices.len(), kind.name()),
            choices.join("\n"),
        )?;

        let answer: String = input(format!("Enter the {} id:", kind.name()))
            .placeholder("customization id")
            .interact()?;

        outro(closing_line(kind, &answer))?;
        Ok(answer)
    }
}

/// The answer is only checked after the prompt closes, so the outro must not
/// claim a selection.
fn closing_line(kind: CustomizationKind, answer: &str) -> String {
    format!("Looking up {} '{answer}'", kind.name())
}
