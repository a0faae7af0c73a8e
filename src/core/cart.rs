//! Cart business logic - The pending selection of one ordering session.
//!
//! A cart is never persisted. It is owned by the session that builds it and is
//! emptied by a successful submission.

use crate::{
    entities::LineItem,
    errors::{Error, Result},
};

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Session-local key used to remove this line
    pub key: u64,
    /// What to order
    pub item_name: String,
    /// Price per unit, positive
    pub unit_price: i64,
    /// Free text for this line
    pub note: String,
    /// Units, at least 1
    pub quantity: u32,
}

impl CartLine {
    /// `unit_price × quantity`, saturating at `i64::MAX`.
    #[must_use]
    pub fn subtotal(&self) -> i64 {
        self.unit_price.saturating_mul(i64::from(self.quantity))
    }

    /// Frozen copy stored on the order.
    #[must_use]
    pub fn to_line_item(&self) -> LineItem {
        LineItem {
            item_name: self.item_name.clone(),
            unit_price: self.unit_price,
            note: self.note.clone(),
            quantity: self.quantity,
        }
    }
}

/// Input for [`Cart::add_line`].
#[derive(Debug, Clone)]
pub struct CartCandidate {
    /// What to order
    pub item_name: String,
    /// Price per unit
    pub unit_price: i64,
    /// Free text
    pub note: String,
    /// Units; `None` means one
    pub quantity: Option<u32>,
}

impl CartCandidate {
    /// A single unit of `item_name` at `unit_price`.
    pub fn new(item_name: impl Into<String>, unit_price: i64) -> Self {
        Self {
            item_name: item_name.into(),
            unit_price,
            note: String::new(),
            quantity: None,
        }
    }

    /// Sets the line note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

/// Parses a price typed into the order form.
///
/// Only positive whole numbers are accepted.
pub fn parse_unit_price(input: &str) -> Result<i64> {
    match input.trim().parse::<i64>() {
        Ok(price) if price > 0 => Ok(price),
        _ => Err(Error::InvalidPrice {
            input: input.to_string(),
        }),
    }
}

/// Candidate line items for one submission.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    next_key: u64,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a line, returning its key.
    ///
    /// # Errors
    /// * `InvalidPrice` - price is not positive
    /// * `EmptyItemName` - name is blank
    /// * `InvalidQuantity` - quantity of zero
    /// * `AmountTooLarge` - the line or the new cart total overflows `i64`
    pub fn add_line(&mut self, candidate: CartCandidate) -> Result<u64> {
        if candidate.unit_price <= 0 {
            return Err(Error::InvalidPrice {
                input: candidate.unit_price.to_string(),
            });
        }
        let item_name = candidate.item_name.trim();
        if item_name.is_empty() {
            return Err(Error::EmptyItemName);
        }
        let quantity = candidate.quantity.unwrap_or(1);
        if quantity == 0 {
            return Err(Error::InvalidQuantity);
        }
        // The new total must still fit in an i64
        let fits = candidate
            .unit_price
            .checked_mul(i64::from(quantity))
            .and_then(|subtotal| self.total().checked_add(subtotal))
            .is_some();
        if !fits {
            return Err(Error::AmountTooLarge {
                item_name: item_name.to_string(),
            });
        }

        let key = self.next_key;
        self.next_key += 1;
        self.lines.push(CartLine {
            key,
            item_name: item_name.to_string(),
            unit_price: candidate.unit_price,
            note: candidate.note.trim().to_string(),
            quantity,
        });
        Ok(key)
    }

    /// Removes the line with `key`. Returns whether a line was removed.
    pub fn remove_line(&mut self, key: u64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.key != key);
        self.lines.len() != before
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .fold(0, i64::saturating_add)
    }

    /// Non-empty line notes joined by `", "`.
    #[must_use]
    pub fn combined_note(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.note.as_str())
            .filter(|note| !note.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when there is nothing to submit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drops every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_add_line_and_total() -> Result<()> {
        let mut cart = Cart::new();
        cart.add_line(CartCandidate::new("Fried Rice", 80))?;
        cart.add_line(CartCandidate::new("Soup", 30))?;
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total(), 110);
        Ok(())
    }

    #[test]
    fn test_total_respects_quantity() -> Result<()> {
        let mut cart = Cart::new();
        cart.add_line(CartCandidate::new("Bubble Tea", 55).with_quantity(3))?;
        cart.add_line(CartCandidate::new("Cookie", 20))?;
        assert_eq!(cart.total(), 185);
        Ok(())
    }

    #[test]
    fn test_add_line_rejects_bad_input() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_line(CartCandidate::new("Soup", 0)),
            Err(Error::InvalidPrice { .. })
        ));
        assert!(matches!(
            cart.add_line(CartCandidate::new("Soup", -5)),
            Err(Error::InvalidPrice { .. })
        ));
        assert!(matches!(
            cart.add_line(CartCandidate::new("   ", 30)),
            Err(Error::EmptyItemName)
        ));
        assert!(matches!(
            cart.add_line(CartCandidate::new("Soup", 30).with_quantity(0)),
            Err(Error::InvalidQuantity)
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_line_rejects_overflowing_amounts() -> Result<()> {
        let mut cart = Cart::new();
        cart.add_line(CartCandidate::new("Gold", i64::MAX))?;
        assert!(matches!(
            cart.add_line(CartCandidate::new("Tea", 1)),
            Err(Error::AmountTooLarge { .. })
        ));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), i64::MAX);

        let mut doubled = Cart::new();
        assert!(matches!(
            doubled.add_line(CartCandidate::new("Gold", i64::MAX / 2 + 1).with_quantity(2)),
            Err(Error::AmountTooLarge { .. })
        ));
        assert!(doubled.is_empty());
        assert_eq!(doubled.total(), 0);
        Ok(())
    }

    #[test]
    fn test_remove_line_by_key() -> Result<()> {
        let mut cart = Cart::new();
        let rice = cart.add_line(CartCandidate::new("Fried Rice", 80))?;
        let soup = cart.add_line(CartCandidate::new("Soup", 30))?;
        assert_ne!(rice, soup);

        assert!(cart.remove_line(rice));
        assert!(!cart.remove_line(rice));
        assert_eq!(cart.total(), 30);
        assert_eq!(cart.lines()[0].item_name, "Soup");
        Ok(())
    }

    #[test]
    fn test_keys_are_not_reused_after_removal() -> Result<()> {
        let mut cart = Cart::new();
        let first = cart.add_line(CartCandidate::new("A", 1))?;
        cart.remove_line(first);
        let second = cart.add_line(CartCandidate::new("B", 1))?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn test_combined_note_skips_empty_notes() -> Result<()> {
        let mut cart = Cart::new();
        cart.add_line(CartCandidate::new("Tea", 40).with_note("less ice"))?;
        cart.add_line(CartCandidate::new("Rice", 80))?;
        cart.add_line(CartCandidate::new("Soup", 30).with_note(" no onion "))?;
        assert_eq!(cart.combined_note(), "less ice, no onion");
        Ok(())
    }

    #[test]
    fn test_parse_unit_price() {
        assert_eq!(parse_unit_price(" 80 ").unwrap(), 80);
        assert!(parse_unit_price("0").is_err());
        assert!(parse_unit_price("-3").is_err());
        assert!(parse_unit_price("12.5").is_err());
        assert!(parse_unit_price("abc").is_err());
    }
}
