//! Stock summary core.
//!
//! Everything in this module is pure computation over in-memory data: flatten
//! nested orders into per-line-item facts, narrow them with a conjunction of
//! optional predicates, group by category pair and derive the remainder
//! (buy minus sell). The orchestration on [`crate::Engine`] only supplies the
//! stored transactions and catalog.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::{Category, Transaction};

/// One grade-level line item extracted from a transaction's nested structure.
///
/// Direction is implicit: facts come from either the buy list or the sell
/// list. Facts are rebuilt on every summary request and never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatFact {
    pub order_id: String,
    pub category_id: String,
    pub sub_category_id: String,
    pub grade: Option<String>,
    pub price: f64,
    pub quantity: f64,
    pub total: f64,
    pub finished_date: Option<NaiveDate>,
    pub finished_time: Option<String>,
}

/// Multi-dimensional filter over flattened facts. Every field is optional;
/// an absent field puts no constraint on that dimension.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SummaryFilter {
    /// Lower bound on the order finish date (inclusive, date-only).
    pub start_finish_date: Option<NaiveDate>,
    /// Upper bound on the order finish date (inclusive, date-only).
    pub end_finish_date: Option<NaiveDate>,
    pub category_ids: Option<Vec<String>>,
    pub sub_category_ids: Option<Vec<String>>,
    pub order_id: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub grades: Option<Vec<String>>,
}

/// One output row of the stock summary report.
#[derive(Clone, Debug, PartialEq)]
pub struct StockSummary {
    pub category_id: String,
    pub sub_category_id: String,
    pub product_name: String,
    pub total_buy_weight: f64,
    pub total_buy_amount: f64,
    pub total_sell_weight: f64,
    pub total_sell_amount: f64,
    pub remain_weight: f64,
    pub remain_amount: f64,
}

/// Display names for one catalog (category, subcategory) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductName {
    pub category_name: String,
    pub sub_category_name: String,
}

/// Lookup from (categoryId, subCategoryId) to display names.
pub type CategoryIndex = HashMap<(String, String), ProductName>;

/// Flattens nested transactions into per-line-item facts.
///
/// Traversal order is transaction, then requested category, then graded item,
/// so the output is deterministic for a given input. A transaction with no
/// requested categories contributes nothing.
pub fn flatten(transactions: &[Transaction]) -> Vec<FlatFact> {
    let mut facts = Vec::new();
    for tx in transactions {
        for requested in &tx.requested_categories {
            for item in &requested.items {
                facts.push(FlatFact {
                    order_id: tx.order_id.clone(),
                    category_id: requested.category_id.clone(),
                    sub_category_id: requested.sub_category_id.clone(),
                    grade: item.grade.clone(),
                    price: item.price,
                    quantity: item.quantity,
                    total: item.total,
                    finished_date: tx.finished_date,
                    finished_time: tx.finished_time.clone(),
                });
            }
        }
    }
    facts
}

fn matches(fact: &FlatFact, filter: &SummaryFilter) -> bool {
    // A fact without a finish date fails any date bound.
    if let Some(start) = filter.start_finish_date {
        match fact.finished_date {
            Some(date) if date >= start => {}
            _ => return false,
        }
    }
    if let Some(end) = filter.end_finish_date {
        match fact.finished_date {
            Some(date) if date <= end => {}
            _ => return false,
        }
    }
    if let Some(ids) = &filter.category_ids
        && !ids.iter().any(|id| *id == fact.category_id)
    {
        return false;
    }
    if let Some(ids) = &filter.sub_category_ids
        && !ids.iter().any(|id| *id == fact.sub_category_id)
    {
        return false;
    }
    if let Some(order_id) = &filter.order_id
        && fact.order_id != *order_id
    {
        return false;
    }
    if let Some(min) = filter.price_min
        && fact.price < min
    {
        return false;
    }
    if let Some(max) = filter.price_max
        && fact.price > max
    {
        return false;
    }
    if let Some(grades) = &filter.grades {
        match &fact.grade {
            Some(grade) if grades.iter().any(|g| g == grade) => {}
            _ => return false,
        }
    }
    true
}

/// Keeps only the facts satisfying every predicate of `filter`.
pub fn apply_filter(facts: Vec<FlatFact>, filter: &SummaryFilter) -> Vec<FlatFact> {
    let mut facts = facts;
    facts.retain(|fact| matches(fact, filter));
    facts
}

/// Builds the display-name lookup from the catalog.
///
/// A category without subcategories contributes no entries; duplicate pairs
/// across catalog rows resolve last-write-wins.
pub fn build_index(categories: &[Category]) -> CategoryIndex {
    let mut index = CategoryIndex::new();
    for category in categories {
        for sub in &category.subcategory {
            index.insert(
                (category.category_id.clone(), sub.sub_category_id.clone()),
                ProductName {
                    category_name: category.category_name.clone(),
                    sub_category_name: sub.sub_category_name.clone(),
                },
            );
        }
    }
    index
}

#[derive(Default)]
struct Accumulator {
    buy_weight: f64,
    buy_amount: f64,
    sell_weight: f64,
    sell_amount: f64,
}

fn product_name(index: &CategoryIndex, key: &(String, String)) -> String {
    match index.get(key) {
        Some(names) => format!("{} / {}", names.category_name, names.sub_category_name),
        None => format!("{} - {}", key.0, key.1),
    }
}

/// Groups facts from both directions by category pair and derives the
/// remainder metrics.
///
/// Rows come out sorted ascending by (categoryId, subCategoryId).
pub fn aggregate(
    buy_facts: &[FlatFact],
    sell_facts: &[FlatFact],
    index: &CategoryIndex,
) -> Vec<StockSummary> {
    let mut groups: BTreeMap<(String, String), Accumulator> = BTreeMap::new();

    for fact in buy_facts {
        let acc = groups
            .entry((fact.category_id.clone(), fact.sub_category_id.clone()))
            .or_default();
        acc.buy_weight += fact.quantity;
        acc.buy_amount += fact.total;
    }
    for fact in sell_facts {
        let acc = groups
            .entry((fact.category_id.clone(), fact.sub_category_id.clone()))
            .or_default();
        acc.sell_weight += fact.quantity;
        acc.sell_amount += fact.total;
    }

    groups
        .into_iter()
        .map(|(key, acc)| {
            let product_name = product_name(index, &key);
            StockSummary {
                category_id: key.0,
                sub_category_id: key.1,
                product_name,
                total_buy_weight: acc.buy_weight,
                total_buy_amount: acc.buy_amount,
                total_sell_weight: acc.sell_weight,
                total_sell_amount: acc.sell_amount,
                remain_weight: acc.buy_weight - acc.sell_weight,
                remain_amount: acc.buy_amount - acc.sell_amount,
            }
        })
        .collect()
}

/// Full pipeline: flatten and filter each direction independently, build the
/// name index once, aggregate both sides into summary rows.
pub fn summarize(
    buy: &[Transaction],
    sell: &[Transaction],
    categories: &[Category],
    filter: &SummaryFilter,
) -> Vec<StockSummary> {
    let buy_facts = apply_filter(flatten(buy), filter);
    let sell_facts = apply_filter(flatten(sell), filter);
    let index = build_index(categories);
    aggregate(&buy_facts, &sell_facts, &index)
}

/// Sorted unique grade labels across all stored transactions.
pub fn distinct_grades(transactions: &[Transaction]) -> Vec<String> {
    let mut grades = BTreeSet::new();
    for tx in transactions {
        for requested in &tx.requested_categories {
            for item in &requested.items {
                if let Some(grade) = &item.grade
                    && !grade.is_empty()
                {
                    grades.insert(grade.clone());
                }
            }
        }
    }
    grades.into_iter().collect()
}
