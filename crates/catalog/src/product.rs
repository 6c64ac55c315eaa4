use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockflow_core::{DomainError, DomainResult, ProductId};

/// A catalog product as stored by the backend.
///
/// Prices are carried in the smallest currency unit (cents). `stock` is never
/// negative in a consistent read; a negative value only ever appears as a
/// backend inconsistency and is handled by the classification engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Price in smallest currency unit (e.g., cents).
    pub price_cents: u64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a product (admin catalog operation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: u64,
    pub stock: i64,
    pub image_url: Option<String>,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }
        Ok(())
    }
}

/// Partial update for a product (admin catalog operation).
///
/// `None` fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price_cents: Option<u64>,
    pub stock: Option<i64>,
    pub image_url: Option<Option<String>>,
}

impl ProductPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }
        if let Some(stock) = self.stock {
            if stock < 0 {
                return Err(DomainError::validation("stock cannot be negative"));
            }
        }
        Ok(())
    }

    /// Apply this patch to an existing product record.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price_cents) = self.price_cents {
            product.price_cents = price_cents;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(image_url) = &self.image_url {
            product.image_url = image_url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            description: None,
            price_cents: 1999,
            stock: 25,
            image_url: None,
        }
    }

    #[test]
    fn new_product_with_valid_fields_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn new_product_rejects_blank_name() {
        let mut p = draft();
        p.name = "   ".to_string();
        let err = p.validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_product_rejects_negative_stock() {
        let mut p = draft();
        p.stock = -1;
        assert!(p.validate().is_err());
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut product = Product {
            id: ProductId::new(),
            name: "Widget".to_string(),
            description: Some("old".to_string()),
            price_cents: 1000,
            stock: 5,
            image_url: None,
            created_at: Utc::now(),
        };

        let patch = ProductPatch {
            price_cents: Some(1500),
            description: Some(None),
            ..ProductPatch::default()
        };
        patch.apply_to(&mut product);

        assert_eq!(product.price_cents, 1500);
        assert_eq!(product.description, None);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.stock, 5);
    }
}
