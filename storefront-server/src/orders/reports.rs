//! Sales reporting
//!
//! Read-only aggregation over stored orders. Line items are unpacked from
//! the comma-joined columns and matched to products by title; prices are the
//! products' current retail prices.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use shared::models::{ProductSummary, SalesReportRow, TopSellingProduct};

use super::engine::OrderEngine;
use super::error::{OrderError, OrderResult};
use super::line_items::parse_line_items;
use super::money::{to_decimal, to_f64};
use crate::db::repository::order::OrderFilter;

/// Number of products in the top-selling list
pub const TOP_SELLING_LIMIT: usize = 5;

/// A calendar month, as `[start, end)` epoch millis in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub month: u32,
    pub year: i32,
}

impl ReportPeriod {
    /// Parse `?month=&year=` query values
    pub fn parse(month: Option<&str>, year: Option<&str>) -> OrderResult<Self> {
        let (Some(month), Some(year)) = (
            month.map(str::trim).filter(|s| !s.is_empty()),
            year.map(str::trim).filter(|s| !s.is_empty()),
        ) else {
            return Err(OrderError::InvalidPeriod("Month and year are required".into()));
        };

        let month: u32 = month
            .parse()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| OrderError::InvalidPeriod(format!("Invalid month: {month}")))?;
        let year: i32 = year
            .parse()
            .ok()
            .filter(|y| (1970..=9999).contains(y))
            .ok_or_else(|| OrderError::InvalidPeriod(format!("Invalid year: {year}")))?;

        Ok(Self { month, year })
    }

    pub fn range_millis(&self) -> OrderResult<(i64, i64)> {
        let invalid = || OrderError::InvalidPeriod(format!("{}-{}", self.year, self.month));
        let start = NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(invalid)?;
        let end = if start.month() == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        }
        .ok_or_else(invalid)?;

        let to_millis = |d: NaiveDate| {
            d.and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis())
                .ok_or_else(invalid)
        };
        Ok((to_millis(start)?, to_millis(end)?))
    }
}

/// Title → product; the lowest id wins when titles repeat
fn index_by_title(products: Vec<ProductSummary>) -> HashMap<String, ProductSummary> {
    let mut index: HashMap<String, ProductSummary> = HashMap::new();
    for p in products {
        match index.get(&p.title) {
            Some(existing) if existing.id <= p.id => {}
            _ => {
                index.insert(p.title.clone(), p);
            }
        }
    }
    index
}

impl OrderEngine {
    /// Top products by quantity summed over every order's line items
    pub async fn top_selling(&self) -> OrderResult<Vec<TopSellingProduct>> {
        let orders = self.orders().list_orders(OrderFilter::default()).await?;
        let products = index_by_title(self.catalog().product_summaries().await?);

        let mut sold: HashMap<String, i64> = HashMap::new();
        for order in &orders {
            for item in parse_line_items(&order.product_title, &order.quantity) {
                if products.contains_key(&item.title) {
                    *sold.entry(item.title).or_default() += item.quantity;
                }
            }
        }

        let mut ranked: Vec<TopSellingProduct> = sold
            .into_iter()
            .filter_map(|(title, total_sold)| {
                products.get(&title).map(|p| TopSellingProduct {
                    product_id: p.id,
                    product_name: p.title.clone(),
                    product_image: p.image1.clone(),
                    product_price: p.retail_price,
                    total_sold,
                })
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.total_sold
                .cmp(&a.total_sold)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });
        ranked.truncate(TOP_SELLING_LIMIT);
        Ok(ranked)
    }

    /// Revenue per product for one calendar month, highest total first
    pub async fn monthly_sales(&self, period: ReportPeriod) -> OrderResult<Vec<SalesReportRow>> {
        let (from, to) = period.range_millis()?;
        let orders = self.orders().list_orders_between(from, to).await?;
        let products = index_by_title(self.catalog().product_summaries().await?);

        let mut quantities: HashMap<String, i64> = HashMap::new();
        for order in &orders {
            for item in parse_line_items(&order.product_title, &order.quantity) {
                if products.contains_key(&item.title) {
                    *quantities.entry(item.title).or_default() += item.quantity;
                }
            }
        }

        let mut rows: Vec<(SalesReportRow, Decimal)> = quantities
            .into_iter()
            .filter_map(|(title, quantity)| {
                let product = products.get(&title)?;
                let total = to_decimal(product.retail_price) * Decimal::from(quantity);
                Some((
                    SalesReportRow {
                        product_title: title,
                        price: product.retail_price,
                        quantity,
                        total: to_f64(total),
                    },
                    total,
                ))
            })
            .collect();
        rows.sort_by(|(a, ta), (b, tb)| {
            tb.cmp(ta)
                .then_with(|| a.product_title.cmp(&b.product_title))
        });

        tracing::debug!(
            month = period.month,
            year = period.year,
            orders = orders.len(),
            products = rows.len(),
            "Monthly sales report computed"
        );
        Ok(rows.into_iter().map(|(row, _)| row).collect())
    }
}
