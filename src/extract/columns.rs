//! Column resolution
//!
//! Configured column references (index, header name, or list of either)
//! are checked against the actual file once, before any row is processed,
//! and turned into plain indices. Later stages never look at a
//! [`ColumnRef`] again.

use log::debug;

use crate::config::{AmountFieldConfig, ColumnRef, TabularFileConfig};
use crate::error::{BillAggError, BillAggResult};

use super::amounts::{AmountColumns, IndicatorColumn};

/// A column reference after validation against the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedColumn {
    /// A single column
    Index(usize),
    /// Fallback columns, first non-empty one wins
    List(Vec<usize>),
}

/// Resolves column references against one file's header row and width
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver<'a> {
    header: Option<&'a [String]>,
    column_count: usize,
}

impl<'a> ColumnResolver<'a> {
    /// Create a resolver for a file with the given header (if any) and width
    pub fn new(header: Option<&'a [String]>, column_count: usize) -> Self {
        Self {
            header,
            column_count,
        }
    }

    /// Resolve a reference that may be a list
    pub fn resolve(&self, column: &ColumnRef) -> BillAggResult<ResolvedColumn> {
        match column {
            ColumnRef::List(refs) => refs
                .iter()
                .map(|r| match r {
                    ColumnRef::List(_) => Err(BillAggError::Config(format!(
                        "nested column lists are not supported: {}",
                        column
                    ))),
                    single => self.resolve_index(single),
                })
                .collect::<BillAggResult<Vec<_>>>()
                .map(ResolvedColumn::List),
            single => self.resolve_index(single).map(ResolvedColumn::Index),
        }
    }

    /// Resolve a reference to exactly one column
    pub fn resolve_index(&self, column: &ColumnRef) -> BillAggResult<usize> {
        match column {
            ColumnRef::Index(idx) => {
                if *idx < 0 || *idx as usize >= self.column_count {
                    return Err(BillAggError::Column(format!(
                        "{}, available columns: 0-{}",
                        idx,
                        self.column_count.saturating_sub(1)
                    )));
                }
                Ok(*idx as usize)
            }
            ColumnRef::Name(name) => {
                let header = self.header.ok_or_else(|| {
                    BillAggError::Config(format!(
                        "column \"{}\" is referenced by name but the file has no header",
                        name
                    ))
                })?;
                let mut matches = header
                    .iter()
                    .enumerate()
                    .filter(|(_, h)| *h == name)
                    .map(|(idx, _)| idx);
                match (matches.next(), matches.next()) {
                    (Some(idx), None) => Ok(idx),
                    (None, _) => Err(BillAggError::Column(format!(
                        "\"{}\", available columns: {:?}",
                        name, header
                    ))),
                    (Some(_), Some(_)) => Err(BillAggError::AmbiguousColumn(name.clone())),
                }
            }
            ColumnRef::List(_) => Err(BillAggError::Config(format!(
                "expected a single column, got {}",
                column
            ))),
        }
    }
}

/// Every configured field of a file, resolved to column indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFields {
    pub date: ResolvedColumn,
    pub time: Option<usize>,
    pub name: usize,
    pub memo: Option<usize>,
    pub amount: AmountColumns,
    /// Extra fields in name order
    pub extra: Vec<(String, usize)>,
}

impl ResolvedFields {
    /// Resolve all fields of a file config
    pub fn resolve(config: &TabularFileConfig, resolver: &ColumnResolver) -> BillAggResult<Self> {
        let fields = &config.fields;

        let date = resolver.resolve(&fields.date.column)?;
        let name = resolver.resolve_index(&fields.name.column)?;
        let time = fields
            .time
            .as_ref()
            .map(|f| resolver.resolve_index(&f.column))
            .transpose()?;
        let memo = fields
            .memo
            .as_ref()
            .map(|f| resolver.resolve_index(&f.column))
            .transpose()?;

        let amount = match &fields.amount {
            AmountFieldConfig::IndicatorColumns { column, indicators } => {
                AmountColumns::IndicatorColumns {
                    column: resolver.resolve_index(column)?,
                    indicators: indicators
                        .iter()
                        .map(|i| {
                            Ok(IndicatorColumn {
                                column: resolver.resolve_index(&i.column)?,
                                inbound_value: i.inbound_value.clone(),
                                outbound_value: i.outbound_value.clone(),
                            })
                        })
                        .collect::<BillAggResult<Vec<_>>>()?,
                }
            }
            AmountFieldConfig::SignedColumn {
                column,
                is_outbound_positive,
            } => AmountColumns::SignedColumn {
                column: resolver.resolve_index(column)?,
                is_outbound_positive: *is_outbound_positive,
            },
            AmountFieldConfig::TwoColumns { inbound, outbound } => AmountColumns::TwoColumns {
                inbound: resolver.resolve_index(&inbound.column)?,
                outbound: resolver.resolve_index(&outbound.column)?,
            },
        };

        let extra = config
            .extra_fields
            .iter()
            .map(|(field, c)| Ok((field.clone(), resolver.resolve_index(&c.column)?)))
            .collect::<BillAggResult<Vec<_>>>()?;

        let resolved = Self {
            date,
            time,
            name,
            memo,
            amount,
            extra,
        };
        debug!("resolved columns: {:?}", resolved);
        Ok(resolved)
    }
}
