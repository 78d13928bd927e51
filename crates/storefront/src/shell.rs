//! Line commands for the interactive storefront.

use std::str::FromStr;

use thiserror::Error;
use vitrine_core::{Price, ProductId};

use crate::cart::LocalStorage;
use crate::error::Result;
use crate::query::SortSpec;
use crate::render::Renderer;
use crate::state::AppState;

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  search [text]      filter by name (no text clears the search)
  category [name]    show one category (no name shows all)
  price [max]        hide products above max (no value clears the limit)
  sort <order>       none, price-asc, price-desc, name-asc, name-desc
  next | prev        move between pages
  page <n>           jump to page n
  show <id>          product details
  add <id>           add a product to the cart
  cart               show the cart
  categories         product counts per category
  reset              clear all filters and sorting
  checkout           place an order
  help               this text
  quit               leave";

/// Errors parsing a command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{command}' does not accept '{value}'")]
    InvalidArgument { command: &'static str, value: String },
}

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Category(Option<String>),
    Price(Option<Price>),
    Sort(SortSpec),
    Next,
    Prev,
    Page(usize),
    Show(ProductId),
    Add(ProductId),
    Cart,
    Categories,
    Reset,
    Checkout,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));
        let arg = (!rest.is_empty()).then_some(rest);

        match name.to_lowercase().as_str() {
            "search" | "s" => Ok(Self::Search(rest.to_string())),
            "category" | "c" => Ok(Self::Category(arg.map(str::to_string))),
            "price" => arg
                .map(|value| {
                    value.parse::<Price>().map_err(|_| CommandError::InvalidArgument {
                        command: "price",
                        value: value.to_string(),
                    })
                })
                .transpose()
                .map(Self::Price),
            "sort" => {
                let value = arg.ok_or(CommandError::MissingArgument("sort"))?;
                let sort = SortSpec::parse(value);
                if sort == SortSpec::None && !value.eq_ignore_ascii_case("none") {
                    return Err(CommandError::InvalidArgument {
                        command: "sort",
                        value: value.to_string(),
                    });
                }
                Ok(Self::Sort(sort))
            }
            "next" | "n" => Ok(Self::Next),
            "prev" | "p" => Ok(Self::Prev),
            "page" => number(arg, "page").map(Self::Page),
            "show" => id(arg, "show").map(Self::Show),
            "add" => id(arg, "add").map(Self::Add),
            "cart" => Ok(Self::Cart),
            "categories" => Ok(Self::Categories),
            "reset" | "all" => Ok(Self::Reset),
            "checkout" => Ok(Self::Checkout),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn number(arg: Option<&str>, command: &'static str) -> std::result::Result<usize, CommandError> {
    let value = arg.ok_or(CommandError::MissingArgument(command))?;
    value.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

fn id(arg: Option<&str>, command: &'static str) -> std::result::Result<ProductId, CommandError> {
    let value = arg.ok_or(CommandError::MissingArgument(command))?;
    value.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

/// What the shell should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Print [`HELP`].
    Help,
    /// Collect the checkout form, then call [`AppState::checkout`].
    Checkout,
    Quit,
}

/// Apply `command` to `state`.
///
/// # Errors
///
/// Returns the error of the underlying [`AppState`] action. It has already
/// been rendered as a notice by then.
pub fn execute<S: LocalStorage, R: Renderer>(
    state: &mut AppState<S, R>,
    command: Command,
) -> Result<Outcome> {
    match command {
        Command::Search(text) => state.set_search(text),
        Command::Category(category) => state.set_category(category),
        Command::Price(ceiling) => state.set_price_ceiling(ceiling),
        Command::Sort(sort) => state.set_sort(sort),
        Command::Next => state.next_page(),
        Command::Prev => state.prev_page(),
        Command::Page(page) => state.go_to_page(page),
        Command::Show(id) => state.show_product(id)?,
        Command::Add(id) => {
            state.add_to_cart(id)?;
        }
        Command::Cart => state.render_cart(),
        Command::Categories => state.render_categories()?,
        Command::Reset => state.reset_filters(),
        Command::Checkout => return Ok(Outcome::Checkout),
        Command::Help => return Ok(Outcome::Help),
        Command::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Continue)
}
