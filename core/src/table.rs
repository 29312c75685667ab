//! Sorting, filtering, column visibility and pagination over the cache.
//!
//! `TableState` never owns products; it computes a view over whatever slice
//! it is given, so the cache stays in remote order.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rust_decimal::RoundingStrategy;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::types::Product;

pub const DEFAULT_PAGE_SIZE: usize = 10;
const EMPTY_MESSAGE: &str = "No products found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Column {
    Name,
    Description,
    Price,
    Category,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Name,
        Column::Description,
        Column::Price,
        Column::Category,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Description => "Description",
            Column::Price => "Price",
            Column::Category => "Category",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Column::ALL
            .into_iter()
            .find(|column| column.header().eq_ignore_ascii_case(name))
    }

    fn cell(self, product: &Product) -> String {
        match self {
            Column::Name => product.name.clone(),
            Column::Description => product.description.clone(),
            Column::Price => format!(
                "R$ {:.2}",
                product
                    .price
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            ),
            Column::Category => product.category.clone(),
        }
    }
}

/// Columns the view can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sorting {
    pub column: SortColumn,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    sorting: Option<Sorting>,
    filter: String,
    hidden: BTreeSet<Column>,
    page_index: usize,
    page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            sorting: None,
            filter: String::new(),
            hidden: BTreeSet::new(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sorting(&self) -> Option<Sorting> {
        self.sorting
    }

    /// Ascending on first use of a column, then flips direction.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        let descending = matches!(
            self.sorting,
            Some(Sorting { column: current, descending: false }) if current == column
        );
        self.sorting = Some(Sorting { column, descending });
    }

    pub fn set_sorting(&mut self, sorting: Option<Sorting>) {
        self.sorting = sorting;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page_index = 0;
    }

    pub fn is_visible(&self, column: Column) -> bool {
        !self.hidden.contains(&column)
    }

    pub fn set_visible(&mut self, column: Column, visible: bool) {
        if visible {
            self.hidden.remove(&column);
        } else {
            self.hidden.insert(column);
        }
    }

    pub fn visible_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| self.is_visible(*column))
            .collect()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page_index = 0;
    }

    /// Jump to `page_index`, clamped to the last page of `products`.
    pub fn set_page_index(&mut self, page_index: usize, products: &[Product]) {
        self.page_index = page_index;
        self.clamp_page(products);
    }

    /// Pull the page index back onto an existing page after the rows shrank.
    pub fn clamp_page(&mut self, products: &[Product]) {
        self.page_index = self.current_page(products);
    }

    /// The page actually shown for `products`.
    pub fn current_page(&self, products: &[Product]) -> usize {
        self.page_index.min(self.page_count(products) - 1)
    }

    /// Number of pages after filtering; at least one.
    pub fn page_count(&self, products: &[Product]) -> usize {
        let matching = products.iter().filter(|p| self.matches(p)).count();
        matching.div_ceil(self.page_size).max(1)
    }

    pub fn can_previous_page(&self, products: &[Product]) -> bool {
        self.current_page(products) > 0
    }

    pub fn can_next_page(&self, products: &[Product]) -> bool {
        self.current_page(products) + 1 < self.page_count(products)
    }

    pub fn next_page(&mut self, products: &[Product]) {
        self.clamp_page(products);
        if self.can_next_page(products) {
            self.page_index += 1;
        }
    }

    pub fn previous_page(&mut self, products: &[Product]) {
        self.page_index = self.current_page(products).saturating_sub(1);
    }

    /// The rows on the current page, filtered then sorted.
    pub fn visible_rows<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut rows: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        if let Some(sorting) = self.sorting {
            rows.sort_by(|a, b| {
                let ordering = compare(sorting.column, a, b);
                if sorting.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        rows.into_iter()
            .skip(self.current_page(products) * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn render(&self, products: &[Product]) -> String {
        let columns = self.visible_columns();
        let rows = self.visible_rows(products);

        let mut builder = Builder::default();
        builder.push_record(columns.iter().map(|column| column.header()));
        if rows.is_empty() {
            builder.push_record([EMPTY_MESSAGE]);
        }
        for product in rows {
            builder.push_record(columns.iter().map(|column| column.cell(product)));
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }

    fn matches(&self, product: &Product) -> bool {
        let needle = self.filter.trim();
        needle.is_empty() || product.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

fn compare(column: SortColumn, a: &Product, b: &Product) -> Ordering {
    match column {
        SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortColumn::Price => a.price.cmp(&b.price),
    }
}
