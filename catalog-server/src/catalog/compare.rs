//! Compare Engine
//!
//! Full outer join of several products' display values over attribute ids.

use std::collections::{HashMap, HashSet};

use shared::models::{CompareCell, CompareRow, CompareTable, ProductDisplayValues};

use super::values::ProductAttributeValueStore;
use crate::utils::{AppError, AppResult};

/// Pure table builder, no storage access
#[derive(Debug, Clone)]
pub struct CompareEngine {
    missing_marker: String,
}

impl CompareEngine {
    pub fn new(missing_marker: impl Into<String>) -> Self {
        Self {
            missing_marker: missing_marker.into(),
        }
    }

    /// 每个出现过的 attributeId 一行，列顺序与输入商品顺序一致
    ///
    /// 行按 sortOrder 升序 (多个商品分类不同时取最小值)，再按名称。
    pub fn build(&self, products: &[ProductDisplayValues]) -> CompareTable {
        struct RowAcc<'a> {
            name: &'a str,
            sort_order: i32,
            by_product: HashMap<i64, &'a str>,
        }

        let mut rows: HashMap<i64, RowAcc<'_>> = HashMap::new();
        for product in products {
            for value in &product.values {
                let acc = rows.entry(value.attribute_id).or_insert_with(|| RowAcc {
                    name: &value.name,
                    sort_order: value.sort_order,
                    by_product: HashMap::new(),
                });
                acc.sort_order = acc.sort_order.min(value.sort_order);
                acc.by_product
                    .entry(product.product_id)
                    .or_insert(value.display.as_str());
            }
        }

        let mut table_rows: Vec<CompareRow> = rows
            .into_iter()
            .map(|(attribute_id, acc)| {
                let displays: Vec<Option<&str>> = products
                    .iter()
                    .map(|p| acc.by_product.get(&p.product_id).copied())
                    .collect();
                // 缺失单元格按占位符文本参与比较
                let rendered: Vec<&str> = displays
                    .iter()
                    .map(|d| d.unwrap_or(self.missing_marker.as_str()))
                    .collect();
                let uniform = rendered.windows(2).all(|w| w[0] == w[1]);

                let cells = products
                    .iter()
                    .zip(displays.iter().zip(&rendered))
                    .map(|(product, (display, &text))| CompareCell {
                        product_id: product.product_id,
                        display: text.to_string(),
                        is_missing: display.is_none(),
                        differs: !uniform,
                    })
                    .collect();

                CompareRow {
                    attribute_id,
                    name: acc.name.to_string(),
                    sort_order: acc.sort_order,
                    cells,
                }
            })
            .collect();

        table_rows.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.attribute_id.cmp(&b.attribute_id))
        });

        CompareTable {
            product_ids: products.iter().map(|p| p.product_id).collect(),
            rows: table_rows,
        }
    }
}

/// Resolves display values for each product, then builds the table
#[derive(Clone)]
pub struct CompareService {
    values: ProductAttributeValueStore,
    engine: CompareEngine,
    max_products: usize,
}

impl CompareService {
    pub fn new(values: ProductAttributeValueStore, engine: CompareEngine, max_products: usize) -> Self {
        Self {
            values,
            engine,
            max_products,
        }
    }

    pub async fn compare(&self, product_ids: &[i64]) -> AppResult<CompareTable> {
        if product_ids.is_empty() {
            return Err(AppError::validation("At least one product is required"));
        }
        if product_ids.len() > self.max_products {
            return Err(AppError::validation(format!(
                "At most {} products can be compared",
                self.max_products
            ))
            .with_detail("max_products", self.max_products));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = product_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(AppError::validation(format!("Product {dup} is listed more than once"))
                .with_detail("product_id", *dup));
        }

        let mut products = Vec::with_capacity(product_ids.len());
        for &product_id in product_ids {
            products.push(self.values.get_display_values(product_id).await?);
        }

        let table = self.engine.build(&products);
        tracing::debug!(
            products = product_ids.len(),
            rows = table.rows.len(),
            "Comparison table built"
        );
        Ok(table)
    }
}
