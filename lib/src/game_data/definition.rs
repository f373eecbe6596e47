use std::str::FromStr;

use derive_more::{Display, Error};

use super::super::markup::MarkupElement;

/// An error that occurred while turning a single definition entry into a
/// record. The entry is discarded, the rest of the file is unaffected.
#[derive(Debug, Display, Error)]
pub enum DefinitionError {
    /// A field the record cannot exist without is absent or empty
    #[display("missing required field {}", _0)]
    MissingField(#[error(not(source))] &'static str),
    /// A numeric attribute holds something that is not a valid quantity
    #[display("invalid quantity {:?} in {}", _1, _0)]
    InvalidQuantity(&'static str, String),
}

/// Fetches a required, non empty attribute.
pub(super) fn required_attribute<'a>(
    element: &'a MarkupElement,
    key: &'static str,
) -> Result<&'a str, DefinitionError> {
    element
        .attribute(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(DefinitionError::MissingField(key))
}

/// Fetches a required attribute and parses it as a quantity.
pub(super) fn quantity_attribute<T: FromStr>(
    element: &MarkupElement,
    key: &'static str,
) -> Result<T, DefinitionError> {
    let raw = required_attribute(element, key)?;
    raw.parse()
        .map_err(|_| DefinitionError::InvalidQuantity(key, raw.to_owned()))
}

/// Like [quantity_attribute], but for amounts that are allowed to be
/// fractional. Negative and non finite amounts are rejected.
pub(super) fn amount_attribute(
    element: &MarkupElement,
    key: &'static str,
) -> Result<f64, DefinitionError> {
    let amount: f64 = quantity_attribute(element, key)?;
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(DefinitionError::InvalidQuantity(key, amount.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantities() {
        let element = MarkupElement::new("Item")
            .with_attribute("Count", "12")
            .with_attribute("Amount", "0.5")
            .with_attribute("Bad", "twelve")
            .with_attribute("Negative", "-1")
            .with_attribute("Blank", " ");
        assert_eq!(quantity_attribute::<u64>(&element, "Count").unwrap(), 12);
        assert_eq!(amount_attribute(&element, "Amount").unwrap(), 0.5);
        assert!(matches!(
            quantity_attribute::<u64>(&element, "Bad"),
            Err(DefinitionError::InvalidQuantity("Bad", _))
        ));
        assert!(quantity_attribute::<u64>(&element, "Negative").is_err());
        assert!(amount_attribute(&element, "Negative").is_err());
        assert!(matches!(
            required_attribute(&element, "Blank"),
            Err(DefinitionError::MissingField("Blank"))
        ));
        assert!(matches!(
            required_attribute(&element, "Missing"),
            Err(DefinitionError::MissingField("Missing"))
        ));
    }
}
