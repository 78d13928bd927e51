//! Plain-text renderer built on Askama templates.
//!
//! Templates live in `crates/storefront/templates/` and receive only
//! preformatted values, so all number formatting happens here.

use std::io::Write;

use askama::Template;
use rust_decimal::Decimal;
use vitrine_core::{Price, Product};

use super::{CartSummary, CatalogPage, Notice, Renderer};
use crate::catalog::{CategoryCount, PriceBounds};

/// Format a money amount with two decimals and the currency label.
fn format_money(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {currency}", amount.round_dp(2))
}

fn format_price(price: Price, currency: &str) -> String {
    format_money(price.amount(), currency)
}

/// Product row for list views.
struct ProductRow<'a> {
    id: String,
    name: &'a str,
    category: &'a str,
    price: String,
}

/// Catalog page template.
#[derive(Template)]
#[template(path = "catalog.txt")]
struct CatalogTemplate<'a> {
    rows: Vec<ProductRow<'a>>,
    page: usize,
    total_pages: usize,
    total_count: usize,
    has_prev: bool,
    has_next: bool,
    filters: String,
}

/// Cart line row.
struct CartRow<'a> {
    name: &'a str,
    price: String,
    quantity: u32,
    line_total: String,
}

/// Cart template.
#[derive(Template)]
#[template(path = "cart.txt")]
struct CartTemplate<'a> {
    rows: Vec<CartRow<'a>>,
    item_count: u64,
    total: String,
}

/// Product detail template.
#[derive(Template)]
#[template(path = "product.txt")]
struct ProductTemplate<'a> {
    id: String,
    name: &'a str,
    image: &'a str,
    description: &'a str,
    price: String,
    category: &'a str,
}

/// Category sidebar template.
#[derive(Template)]
#[template(path = "categories.txt")]
struct CategoriesTemplate<'a> {
    counts: &'a [CategoryCount],
}

/// Order confirmation template.
#[derive(Template)]
#[template(path = "order.txt")]
struct OrderTemplate<'a> {
    order_id: String,
    placed_at: String,
    name: &'a str,
    phone: &'a str,
    address: &'a str,
    item_count: u64,
    total: String,
}

/// Renders storefront state as text into any writer.
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
    currency: String,
}

impl<W: Write> TextRenderer<W> {
    /// Render into `out`, labelling prices with `currency`.
    pub fn new(out: W, currency: impl Into<String>) -> Self {
        Self {
            out,
            currency: currency.into(),
        }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    #[must_use]
    pub const fn writer(&self) -> &W {
        &self.out
    }

    /// Write a free-form line, such as help text.
    pub fn write_line(&mut self, text: &str) {
        self.line(text);
    }

    /// Write `text` without a newline and flush, for input prompts.
    pub fn prompt(&mut self, text: &str) {
        if let Err(e) = write!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write prompt");
        }
    }

    fn emit(&mut self, rendered: askama::Result<String>) {
        match rendered {
            Ok(text) => self.line(text.trim_end()),
            Err(e) => tracing::error!(error = %e, "template rendering failed"),
        }
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "failed to write output");
        }
    }

    fn describe_filters(&self, page: &CatalogPage<'_>) -> String {
        let mut parts = Vec::new();
        if !page.filter.search().is_empty() {
            parts.push(format!("search \"{}\"", page.filter.search()));
        }
        if let Some(category) = page.filter.category() {
            parts.push(format!("category {category}"));
        }
        if let Some(ceiling) = page.filter.price_ceiling() {
            parts.push(format!("up to {}", format_price(ceiling, &self.currency)));
        }
        if page.sort != crate::query::SortSpec::None {
            parts.push(format!("sorted {}", page.sort));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn catalog(&mut self, page: &CatalogPage<'_>) {
        let template = CatalogTemplate {
            rows: page
                .result
                .items
                .iter()
                .map(|p| ProductRow {
                    id: p.id.to_string(),
                    name: &p.name,
                    category: &p.category,
                    price: format_price(p.price, &self.currency),
                })
                .collect(),
            page: page.result.page,
            total_pages: page.result.total_pages,
            total_count: page.result.total_count,
            has_prev: page.result.has_prev(),
            has_next: page.result.has_next(),
            filters: self.describe_filters(page),
        };
        self.emit(template.render());
    }

    fn cart(&mut self, cart: &CartSummary<'_>) {
        let template = CartTemplate {
            rows: cart
                .lines
                .iter()
                .map(|l| CartRow {
                    name: &l.product.name,
                    price: format_price(l.product.price, &self.currency),
                    quantity: l.quantity,
                    line_total: format_money(l.line_total(), &self.currency),
                })
                .collect(),
            item_count: cart.item_count,
            total: format_money(cart.total, &self.currency),
        };
        self.emit(template.render());
    }

    fn product_detail(&mut self, product: &Product) {
        let template = ProductTemplate {
            id: product.id.to_string(),
            name: &product.name,
            image: &product.image,
            description: &product.description,
            price: format_price(product.price, &self.currency),
            category: &product.category,
        };
        self.emit(template.render());
    }

    fn category_counts(&mut self, counts: &[CategoryCount]) {
        self.emit(CategoriesTemplate { counts }.render());
    }

    fn price_bounds(&mut self, bounds: Option<PriceBounds>) {
        let text = bounds.map_or_else(
            || "Price range: catalog is empty".to_string(),
            |b| {
                format!(
                    "Price range: {} - {}",
                    format_price(b.min, &self.currency),
                    format_price(b.max, &self.currency)
                )
            },
        );
        self.line(&text);
    }

    fn notice(&mut self, notice: &Notice) {
        match notice {
            Notice::FeedUnavailable(message) | Notice::CartNotSaved(message) => {
                self.line(&format!("! {message}"));
            }
            Notice::ProductNotFound(id) => self.line(&format!("! Product {id} was not found")),
            Notice::CheckoutRejected(err) => self.line(&format!("! {err}")),
            Notice::OrderPlaced(order) => {
                let template = OrderTemplate {
                    order_id: order.order_id.to_string(),
                    placed_at: order.placed_at.format("%Y-%m-%d %H:%M UTC").to_string(),
                    name: order.customer.name(),
                    phone: order.customer.phone(),
                    address: order.customer.address(),
                    item_count: order.item_count,
                    total: format_money(order.total, &self.currency),
                };
                self.emit(template.render());
            }
        }
    }
}
