//! Product detail and similar-product endpoints.
//!
//! Detail pages are demo-grade static payloads: scraped products are not
//! persisted between searches, so there is nothing durable to look up yet.

use axum::extract::Path;
use axum::Json;
use serde_json::{json, Value};

/// GET /api/products/:id
pub async fn product_detail_handler(Path(id): Path<String>) -> Json<Value> {
    let product = json!({
        "id": id,
        "name": "ASUS ROG Strix G16 Gaming Laptop",
        "brand": "ASUS",
        "category": "laptops",
        "image": "https://images.unsplash.com/photo-1603302576837-37561b2e2302?w=800",
        "description": "High-performance gaming laptop with latest RTX graphics and cutting-edge cooling technology",
        "specs": {
            "cpu": "Intel Core i9-13980HX",
            "gpu": "NVIDIA RTX 4070",
            "ram": "32GB DDR5",
            "storage": "1TB SSD",
            "screen": "16-inch QHD 240Hz",
            "weight": "2.5 kg",
            "battery": "90Wh"
        },
        "features": [
            "RGB Keyboard",
            "Advanced Cooling System",
            "Wi-Fi 6E",
            "Thunderbolt 4",
            "Windows 11 Pro"
        ],
        "prices": [
            {
                "store": "Best Buy",
                "storeSlug": "bestbuy",
                "price": 2299.99,
                "originalPrice": 2599.99,
                "inStock": true,
                "url": "https://www.bestbuy.com"
            },
            {
                "store": "Amazon",
                "storeSlug": "amazon",
                "price": 2249.99,
                "originalPrice": 2599.99,
                "inStock": true,
                "url": "https://www.amazon.com"
            }
        ]
    });

    Json(json!({ "success": true, "product": product }))
}

/// GET /api/products/:id/similar
pub async fn similar_products_handler(Path(_id): Path<String>) -> Json<Value> {
    let similar = json!([
        {
            "id": "similar-1",
            "name": "MSI Raider GE78HX",
            "image": "https://images.unsplash.com/photo-1588872657578-7efd1f1555ed?w=400",
            "price": 3799.99,
            "specs": { "gpu": "RTX 4090", "ram": "64GB" }
        },
        {
            "id": "similar-2",
            "name": "Lenovo Legion Pro 7i",
            "image": "https://images.unsplash.com/photo-1593642632823-8f785ba67e45?w=400",
            "price": 2699.99,
            "specs": { "gpu": "RTX 4080", "ram": "32GB" }
        }
    ]);

    Json(json!({ "success": true, "similar": similar }))
}
