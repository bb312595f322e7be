//! Wire shapes returned by the REST data service.
//!
//! Parsing is strict: a missing column or a wrong type rejects the whole
//! result set instead of producing half-mapped records.

use serde::Deserialize;

use crate::error::FetchError;
use crate::graph::{Category, CategoryId, Product};

pub const CATEGORY_TABLE: &str = "categories";
pub const CATEGORY_COLUMNS: &str = "id,name";
pub const PRODUCT_TABLE: &str = "products";
pub const PRODUCT_COLUMNS: &str = "id,products,product_categories(category_id)";

#[derive(Debug, Deserialize)]
struct CategoryRow {
	id: i64,
	name: String,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
	products: String,
	product_categories: Vec<MembershipRow>,
}

#[derive(Debug, Deserialize)]
struct MembershipRow {
	category_id: i64,
}

impl From<CategoryRow> for Category {
	fn from(row: CategoryRow) -> Self {
		Self {
			id: CategoryId(row.id),
			name: row.name,
		}
	}
}

impl From<ProductRow> for Product {
	fn from(row: ProductRow) -> Self {
		Self {
			name: row.products,
			categories: row
				.product_categories
				.into_iter()
				.map(|m| CategoryId(m.category_id))
				.collect(),
		}
	}
}

/// Categories in the order the service returned them.
pub fn parse_categories(body: &str) -> Result<Vec<Category>, FetchError> {
	serde_json::from_str::<Vec<CategoryRow>>(body)
		.map(|rows| rows.into_iter().map(Category::from).collect())
		.map_err(|e| FetchError::shape(CATEGORY_TABLE, e))
}

/// Products in the order the service returned them.
pub fn parse_products(body: &str) -> Result<Vec<Product>, FetchError> {
	serde_json::from_str::<Vec<ProductRow>>(body)
		.map(|rows| rows.into_iter().map(Product::from).collect())
		.map_err(|e| FetchError::shape(PRODUCT_TABLE, e))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn categories_keep_service_order() {
		let cats = parse_categories(r#"[{"id":5,"name":"Veg"},{"id":1,"name":"Fruit"}]"#).unwrap();
		assert_eq!(cats[0].id, CategoryId(5));
		assert_eq!(cats[1].name, "Fruit");
	}

	#[test]
	fn product_memberships_become_a_set() {
		let body = r#"[
			{"id":1,"products":"Tomato","product_categories":[{"category_id":2},{"category_id":1},{"category_id":2}]},
			{"id":2,"products":"Salt","product_categories":[]}
		]"#;
		let products = parse_products(body).unwrap();
		assert_eq!(products[0].name, "Tomato");
		assert_eq!(
			products[0].categories.iter().copied().collect::<Vec<_>>(),
			[CategoryId(1), CategoryId(2)]
		);
		assert!(products[1].categories.is_empty());
	}

	#[test]
	fn extra_columns_are_tolerated() {
		let cats = parse_categories(r#"[{"id":1,"name":"Fruit","created_at":"2024-01-01"}]"#);
		assert_eq!(cats.map(|c| c.len()), Ok(1));
	}

	#[test]
	fn product_rows_only_need_name_and_memberships() {
		let body = r#"[
			{"products":"Apple","product_categories":[{"category_id":1}]},
			{"id":7,"products":"Pear","price":2.5,"product_categories":[{"category_id":1}]}
		]"#;
		let names: Vec<_> = parse_products(body).unwrap().into_iter().map(|p| p.name).collect();
		assert_eq!(names, ["Apple", "Pear"]);
	}

	#[test]
	fn mismatched_rows_are_a_shape_error() {
		let missing_name = parse_categories(r#"[{"id":1}]"#);
		assert!(matches!(missing_name, Err(FetchError::Shape { .. })));

		let string_id = parse_categories(r#"[{"id":"1","name":"Fruit"}]"#);
		assert!(matches!(string_id, Err(FetchError::Shape { .. })));

		let null_name = parse_products(r#"[{"id":1,"products":null,"product_categories":[]}]"#);
		assert!(matches!(null_name, Err(FetchError::Shape { ref table, .. }) if table == PRODUCT_TABLE));

		let not_a_list = parse_products(r#"{"message":"permission denied"}"#);
		assert!(matches!(not_a_list, Err(FetchError::Shape { .. })));
	}
}
