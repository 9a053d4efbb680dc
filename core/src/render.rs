//! Render model for the storefront page.
//!
//! A `Page` is a pure function of the view state: the inline error (if any)
//! followed by one card per sweet in the last loaded snapshot.

use std::fmt;

use crate::types::Sweet;

pub const PAGE_TITLE: &str = "🍬 Sweet Shop";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    /// Inline error line, rendered before the cards.
    pub alert: Option<String>,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: u64,
    pub name: String,
    pub category: String,
    /// Currency-prefixed price, e.g. `₹2.5`.
    pub price: String,
    pub quantity: u32,
    /// The purchase control is disabled when nothing is left.
    pub purchasable: bool,
}

impl Card {
    pub fn from_sweet(sweet: &Sweet, currency: &str) -> Self {
        Self {
            id: sweet.id,
            name: sweet.name.clone(),
            category: sweet.category.clone(),
            price: format!("{currency}{}", sweet.price),
            quantity: sweet.quantity,
            purchasable: sweet.in_stock(),
        }
    }
}

pub fn render_page(sweets: Option<&[Sweet]>, error: Option<&str>, currency: &str) -> Page {
    Page {
        title: PAGE_TITLE.to_string(),
        alert: error.map(str::to_string),
        cards: sweets
            .unwrap_or_default()
            .iter()
            .map(|s| Card::from_sweet(s, currency))
            .collect(),
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        if let Some(alert) = &self.alert {
            writeln!(f, "!! {alert}")?;
            writeln!(f)?;
        }
        for card in &self.cards {
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+--------------------------------")?;
        writeln!(f, "| {}", self.name)?;
        writeln!(f, "| Category: {}", self.category)?;
        writeln!(f, "| Price: {}", self.price)?;
        writeln!(f, "| Quantity: {}", self.quantity)?;
        if self.purchasable {
            writeln!(f, "| [Purchase]  buy {}", self.id)?;
        } else {
            writeln!(f, "| [Purchase]  (unavailable)")?;
        }
        writeln!(f, "+--------------------------------")
    }
}
