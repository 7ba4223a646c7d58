//! Retail sales dashboard core: load a sales table, filter it by year and
//! state, and aggregate the filtered rows into KPIs and chart series.

pub mod data;
pub mod view;
