//! Catalog: the repair services customers can book.

use serde::{Deserialize, Serialize};

use crate::extra::ExtraFields;
use crate::id::ServiceId;
use crate::price::Price;

/// An offerable service with a fixed set of bookable time slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: ServiceId,
    pub name: String,
    pub price: Price,
    /// Slot labels in display order (e.g. `"08.00 AM - 08.30 AM"`).
    pub slots: Vec<String>,
    pub available: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Service {
    /// Create a builder for constructing a [`Service`].
    #[must_use]
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::default()
    }

    /// Bare record created when an availability upsert targets an unknown id.
    #[must_use]
    pub fn placeholder(id: ServiceId, available: bool) -> Self {
        Self {
            id,
            name: String::new(),
            price: Price::default(),
            slots: Vec::new(),
            available,
            extra: ExtraFields::new(),
        }
    }
}

/// Step-by-step builder for [`Service`].
#[derive(Debug, Default)]
pub struct ServiceBuilder {
    id: Option<ServiceId>,
    name: Option<String>,
    price: Option<Price>,
    slots: Vec<String>,
    available: Option<bool>,
    extra: ExtraFields,
}

impl ServiceBuilder {
    #[must_use]
    pub fn id(mut self, id: ServiceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn slot(mut self, slot: impl Into<String>) -> Self {
        self.slots.push(slot.into());
        self
    }

    #[must_use]
    pub fn slots<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slots.extend(slots.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    #[must_use]
    pub fn extra(mut self, extra: ExtraFields) -> Self {
        self.extra = extra;
        self
    }

    /// Consume the builder and return a [`Service`].
    ///
    /// New services are available unless told otherwise. Fields are taken
    /// as given: the catalog stores whatever the caller sends.
    #[must_use]
    pub fn build(self) -> Service {
        Service {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            slots: self.slots,
            available: self.available.unwrap_or(true),
            extra: self.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_build_valid_service_when_name_provided() {
        let service = Service::builder()
            .name("Laptop screen replacement")
            .price(Price::new(120.0).unwrap())
            .slots(["9am", "10am"])
            .build();

        assert_eq!(service.slots, vec!["9am", "10am"]);
        assert!(service.available);
    }

    #[test]
    fn should_accept_service_without_name() {
        let service = Service::builder().slots(["9am"]).build();
        assert!(service.name.is_empty());
        assert_eq!(service.slots, vec!["9am"]);
    }

    #[test]
    fn should_keep_extra_fields_through_serde() {
        let mut extra = ExtraFields::new();
        extra.insert("img".to_string(), json!("https://i.ibb.co/x.png"));
        let service = Service::builder()
            .name("Data recovery")
            .extra(extra)
            .build();

        let value = serde_json::to_value(&service).unwrap();
        assert_eq!(value["img"], "https://i.ibb.co/x.png");
        assert_eq!(value["_id"], service.id.to_string());

        let parsed: Service = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, service);
    }

    #[test]
    fn should_create_unnamed_placeholder() {
        let id = ServiceId::new();
        let service = Service::placeholder(id, false);
        assert_eq!(service.id, id);
        assert!(service.slots.is_empty());
        assert!(!service.available);
    }
}
