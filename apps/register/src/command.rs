//! Register commands read from the terminal and their execution against the controller.

use checkout_client::{CheckoutController, CheckoutError};

pub const HELP: &str = "\
commands:
  <code>          look up a product code (same as `lookup <code>`)
  code <value>    edit the code field without looking it up
  lookup [code]   look up the given code, or the code field
  add             add the looked-up product to the cart
  buy             submit the cart for purchase
  close           close the purchase receipt and start over
  show            redraw the register
  help            show this message
  quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterCommand {
    EditCode(String),
    Lookup(Option<String>),
    AddToCart,
    Purchase,
    ClosePopup,
    Show,
    Help,
    Quit,
}

impl RegisterCommand {
    /// Blank lines parse to `None`. Unrecognised input is treated as a scanned code.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };
        let cmd = match keyword {
            "code" => Self::EditCode(rest.to_string()),
            "lookup" if rest.is_empty() => Self::Lookup(None),
            "lookup" => Self::Lookup(Some(rest.to_string())),
            "add" if rest.is_empty() => Self::AddToCart,
            "buy" | "purchase" if rest.is_empty() => Self::Purchase,
            "close" if rest.is_empty() => Self::ClosePopup,
            "show" if rest.is_empty() => Self::Show,
            "help" | "?" if rest.is_empty() => Self::Help,
            "quit" | "exit" if rest.is_empty() => Self::Quit,
            _ => Self::Lookup(Some(line.to_string())),
        };
        Some(cmd)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::EditCode(_) => "edit_code",
            Self::Lookup(_) => "lookup",
            Self::AddToCart => "add_to_cart",
            Self::Purchase => "purchase",
            Self::ClosePopup => "close_popup",
            Self::Show => "show",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }

    /// Commands still accepted while the purchase receipt is open.
    fn allowed_with_popup(&self) -> bool {
        matches!(
            self,
            Self::ClosePopup | Self::Show | Self::Help | Self::Quit
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render,
    Notice(&'static str),
    Help,
    Quit,
}

pub async fn execute(controller: &CheckoutController, cmd: RegisterCommand) -> Outcome {
    let cmd_name = cmd.name();
    let session = controller.snapshot().await;

    if session.popup_visible && !cmd.allowed_with_popup() {
        return Outcome::Notice("purchase receipt is open; `close` it before continuing");
    }

    let result: Result<(), CheckoutError> = match cmd {
        RegisterCommand::EditCode(code) => {
            controller.edit_code(code).await;
            Ok(())
        }
        RegisterCommand::Lookup(code) => {
            let code = match code {
                Some(code) => {
                    controller.edit_code(code.clone()).await;
                    code
                }
                None => session.draft.code,
            };
            controller.lookup_product(&code).await.map(|_| ())
        }
        RegisterCommand::AddToCart => controller.add_to_cart().await.map(|_| ()),
        RegisterCommand::Purchase => controller.submit_purchase().await.map(|_| ()),
        RegisterCommand::ClosePopup => {
            if !session.popup_visible {
                return Outcome::Notice("no purchase receipt to close");
            }
            controller.close_purchase_popup().await;
            Ok(())
        }
        RegisterCommand::Show => Ok(()),
        RegisterCommand::Help => return Outcome::Help,
        RegisterCommand::Quit => return Outcome::Quit,
    };

    match result {
        Ok(()) => tracing::debug!(command = cmd_name, "register command applied"),
        Err(CheckoutError::Busy) => return Outcome::Notice("purchase already in progress"),
        Err(err) => tracing::debug!(command = cmd_name, "register command failed: {err}"),
    }
    Outcome::Render
}

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod tests;
