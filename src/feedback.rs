//! User-facing notices for mutating actions.
//!
//! Every cart, checkout and assignment action ends in exactly one [`Notice`]. Errors map
//! through [`Notice::from_error`]; a partially placed order gets its own title so it is
//! never mistaken for an ordinary failure.

use crate::errors::Error;

/// Notice style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Confirmation
    Success,
    /// Failure
    Destructive,
}

/// A transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Style
    pub tone: Tone,
    /// Headline
    pub title: String,
    /// Optional detail line
    pub description: Option<String>,
}

impl Notice {
    fn success(title: &str, description: Option<&str>) -> Self {
        Self {
            tone: Tone::Success,
            title: title.to_string(),
            description: description.map(ToString::to_string),
        }
    }

    fn failure(title: &str, description: impl Into<String>) -> Self {
        Self {
            tone: Tone::Destructive,
            title: title.to_string(),
            description: Some(description.into()),
        }
    }

    /// Item added to the cart
    #[must_use]
    pub fn added_to_cart(item_name: &str) -> Self {
        Self::success("Added to cart", Some(item_name))
    }

    /// Cart quantity changed
    #[must_use]
    pub fn cart_updated() -> Self {
        Self::success("Cart updated", None)
    }

    /// Item removed from the cart
    #[must_use]
    pub fn removed_from_cart() -> Self {
        Self::success("Item removed", None)
    }

    /// Order placed
    #[must_use]
    pub fn order_placed() -> Self {
        Self::success("Order placed successfully!", Some("Your order will be ready soon"))
    }

    /// Assignment created
    #[must_use]
    pub fn assignment_created() -> Self {
        Self::success("Assignment created!", None)
    }

    /// Failure notice for any error
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::EmptyCart => {
                Self::failure("Cart is empty", "Please add items to your cart first")
            }
            Error::PartialOrder { .. } => Self::failure("Order needs attention", error.to_string()),
            Error::Validation { message } => Self {
                tone: Tone::Destructive,
                title: message.clone(),
                description: None,
            },
            _ => Self::failure("Error", error.to_string()),
        }
    }
}

impl From<&Error> for Notice {
    fn from(error: &Error) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cart_notice() {
        let notice = Notice::from_error(&Error::EmptyCart);
        assert_eq!(notice.tone, Tone::Destructive);
        assert_eq!(notice.title, "Cart is empty");
        assert_eq!(
            notice.description.as_deref(),
            Some("Please add items to your cart first")
        );
    }

    #[test]
    fn test_partial_order_is_distinct_from_generic_error() {
        let partial = Notice::from_error(&Error::PartialOrder {
            order_id: 3,
            message: "the cart could not be cleared".to_string(),
        });
        let generic = Notice::from_error(&Error::OrderNotFound { id: 3 });
        assert_ne!(partial.title, generic.title);
        assert_eq!(generic.title, "Error");
        assert!(partial.description.unwrap().contains("#3"));
    }

    #[test]
    fn test_success_notices() {
        let placed = Notice::order_placed();
        assert_eq!(placed.tone, Tone::Success);
        assert_eq!(placed.title, "Order placed successfully!");
        assert_eq!(Notice::assignment_created().title, "Assignment created!");
    }

    #[test]
    fn test_cart_notices() {
        let added = Notice::added_to_cart("Samosa");
        assert_eq!(added.tone, Tone::Success);
        assert_eq!(added.title, "Added to cart");
        assert_eq!(added.description.as_deref(), Some("Samosa"));

        let updated = Notice::cart_updated();
        assert_eq!(updated.tone, Tone::Success);
        assert_eq!(updated.title, "Cart updated");
        assert!(updated.description.is_none());

        let removed = Notice::removed_from_cart();
        assert_eq!(removed.tone, Tone::Success);
        assert_eq!(removed.title, "Item removed");
        assert!(removed.description.is_none());
    }

    #[test]
    fn test_validation_notice_uses_message_as_title() {
        let notice = Notice::from_error(&Error::Validation {
            message: "Please add at least one task".to_string(),
        });
        assert_eq!(notice.title, "Please add at least one task");
        assert!(notice.description.is_none());
    }
}
