//! Interactive prompts.

use dialoguer::Confirm;

use crate::ui::UiContext;

/// Ask a yes/no question, defaulting to no.
///
/// Without a terminal on both stdin and stdout there is nobody to ask, so
/// the answer is yes.
pub fn confirm(ui_ctx: &UiContext, prompt: &str) -> anyhow::Result<bool> {
    if !ui_ctx.is_interactive() {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
