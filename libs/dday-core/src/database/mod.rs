//! Database module: query building, row mapping and the record store

mod core;
pub mod mappers;
pub mod query_builders;

pub use core::*;

pub use mappers::map_dday_row;
pub use query_builders::{
    BuiltQuery, Column, CompareOp, DDayQueryBuilder, EqualityFilter, PagingWindow, QueryPart,
    QueryValue, SortDirection, SortSpec, TextSearchFilter,
};
