//! Built-in accessory list shown next to the catalog. Read-only.

use serde::Serialize;

/// Stock status of an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Availability {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

/// A display-only accessory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accessory {
    pub id: &'static str,
    pub name: &'static str,
    pub available: Availability,
    /// Display price including the currency symbol.
    pub price: &'static str,
    pub image: &'static str,
}

static ACCESSORIES: [Accessory; 3] = [
    Accessory {
        id: "1",
        name: "Bluetooth Headset",
        available: Availability::InStock,
        price: "$29.99",
        image: "https://cdn-icons-png.freepik.com/256/1554/1554363.png",
    },
    Accessory {
        id: "2",
        name: "Smartwatch",
        available: Availability::OutOfStock,
        price: "$59.99",
        image: "https://cdn11.bigcommerce.com/s-10c6f/images/stencil/1280x1280/products/58356/85040/FS46092__41401.1606332969.jpg?c=2",
    },
    Accessory {
        id: "3",
        name: "Wireless Mouse",
        available: Availability::InStock,
        price: "$19.99",
        image: "https://cdn-icons-png.freepik.com/256/4163/4163092.png",
    },
];

/// The compiled-in accessory list.
pub fn accessories() -> &'static [Accessory] {
    &ACCESSORIES
}
