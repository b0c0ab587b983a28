//! Command parsing for the terminal front end.

use crate::types::{CategoryFilter, ProductId, UnknownCategory};
use thiserror::Error;

/// One line of user input, parsed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show the filtered product grid
    List,
    /// Show the category bar
    Categories,
    /// Select a category
    Category(CategoryFilter),
    /// Set (or clear, when empty) the search text
    Search(String),
    /// Show one product
    Show(ProductId),
    /// Add one unit to the cart
    Add(ProductId),
    /// Remove a line from the cart
    Remove(ProductId),
    /// Change a line's quantity
    Adjust(ProductId, i64),
    /// Open the cart drawer
    Cart,
    /// Close the cart drawer
    Close,
    /// Check out
    Checkout,
    /// Leave the success screen
    Continue,
    /// Ask the assistant
    Ask(String),
    /// Print the transcript
    Chat,
    /// Dump the session as JSON
    Snapshot,
    /// Show usage
    Help,
    /// Exit
    Quit,
}

/// Input that is not a command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown verb
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    /// Verb needs an argument
    #[error("`{0}` needs {1}")]
    MissingArgument(&'static str, &'static str),
    /// Bad category label
    #[error(transparent)]
    Category(#[from] UnknownCategory),
}

/// Usage text
pub const HELP: &str = "\
list                 show products matching the current filters
categories           show category filters
category <label>     filter by category (All, Electronics, Fashion, Home, Beauty, Wellness)
search [text]        search names and descriptions; no text clears the search
show <id>            product details
add <id>             add one to the cart
remove <id>          remove a line from the cart
inc <id> / dec <id>  change a line's quantity
cart / close         open / close the cart drawer
checkout             place the order
continue             back to browsing after an order
ask <text>           ask Nova, the shopping assistant
chat                 show the conversation
snapshot             print the session as JSON
help                 this text
quit                 exit";

impl std::str::FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        let id = |name: &'static str| {
            if rest.is_empty() {
                Err(ParseError::MissingArgument(name, "a product id"))
            } else {
                Ok(ProductId::new(rest))
            }
        };

        Ok(match verb.to_ascii_lowercase().as_str() {
            "list" | "ls" => Self::List,
            "categories" => Self::Categories,
            "category" | "cat" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("category", "a label"));
                }
                Self::Category(rest.parse()?)
            },
            "search" => Self::Search(rest.to_string()),
            "show" => Self::Show(id("show")?),
            "add" => Self::Add(id("add")?),
            "remove" | "rm" => Self::Remove(id("remove")?),
            "inc" => Self::Adjust(id("inc")?, 1),
            "dec" => Self::Adjust(id("dec")?, -1),
            "cart" => Self::Cart,
            "close" => Self::Close,
            "checkout" => Self::Checkout,
            "continue" => Self::Continue,
            "ask" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("ask", "a question"));
                }
                Self::Ask(rest.to_string())
            },
            "chat" => Self::Chat,
            "snapshot" => Self::Snapshot,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        })
    }
}
