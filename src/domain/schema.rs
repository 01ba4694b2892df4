use crate::domain::model::{PreparedRecord, Record};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeSet, HashMap};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%d/%m/%Y", "%d.%m.%Y"];
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Date,
    Timestamp,
}

impl FieldKind {
    /// Validates a raw value for this kind. Values are trimmed (text is kept
    /// verbatim) but never reformatted.
    pub fn coerce(self, raw: &str) -> Result<Option<String>, String> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let value = raw.trim();
        let valid = match self {
            FieldKind::Text => return Ok(Some(raw.to_string())),
            FieldKind::Integer => value.parse::<i64>().is_ok(),
            FieldKind::Decimal => value
                .parse::<f64>()
                .map(|number| number.is_finite())
                .unwrap_or(false),
            FieldKind::Date => parse_date(value).is_some(),
            FieldKind::Timestamp => parse_timestamp(value).is_some(),
        };
        if valid {
            Ok(Some(value.to_string()))
        } else {
            Err(format!("'{}' is not a valid {}", value, self.label()))
        }
    }

    fn label(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "number",
            FieldKind::Date => "date",
            FieldKind::Timestamp => "timestamp",
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| parse_date(value).and_then(|date| date.and_hms_opt(0, 0, 0)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
}

impl FieldSpec {
    fn coerce(&self, raw: &str) -> Result<Option<String>, String> {
        match self.kind.coerce(raw) {
            Ok(None) if self.required => Err(format!("missing value for {}", self.name)),
            Ok(value) => Ok(value),
            Err(reason) => Err(format!("{}: {}", self.name, reason)),
        }
    }
}

/// Header-less rows with a fixed number of fields, submitted in file order.
#[derive(Debug, Clone)]
pub struct PositionalSchema {
    pub delimiter: u8,
    pub fields: &'static [FieldSpec],
}

/// Rows described by a header line. `columns` lists the required columns in
/// the order the endpoint takes them; extra file columns are carried through
/// to the outputs but never submitted.
#[derive(Debug, Clone)]
pub struct HeaderSchema {
    pub delimiter: u8,
    pub columns: &'static [FieldSpec],
}

#[derive(Debug, Clone)]
pub enum Schema {
    Positional(PositionalSchema),
    Header(HeaderSchema),
}

/// Maps each required column to its index in a file header.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    indices: Vec<usize>,
}

impl Schema {
    pub fn delimiter(&self) -> u8 {
        match self {
            Schema::Positional(schema) => schema.delimiter,
            Schema::Header(schema) => schema.delimiter,
        }
    }

    pub fn has_header(&self) -> bool {
        matches!(self, Schema::Header(_))
    }

    /// Resolves a header against the required column set. On failure returns
    /// the missing column names, sorted.
    pub fn resolve_header(&self, header: &[String]) -> Result<Option<ColumnIndex>, Vec<String>> {
        let Schema::Header(schema) = self else {
            return Ok(None);
        };

        let positions: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(index, name)| (name.trim(), index))
            .collect();

        let required: BTreeSet<&str> = schema.columns.iter().map(|column| column.name).collect();
        let present: BTreeSet<&str> = positions.keys().copied().collect();
        let missing: Vec<String> = required
            .difference(&present)
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let indices = schema
            .columns
            .iter()
            .map(|column| positions[column.name])
            .collect();
        Ok(Some(ColumnIndex { indices }))
    }

    /// Number of fields a structurally valid row carries.
    pub fn expected_width(&self, header: Option<&[String]>) -> usize {
        match (self, header) {
            (Schema::Header(_), Some(header)) => header.len(),
            (Schema::Header(schema), None) => schema.columns.len(),
            (Schema::Positional(schema), _) => schema.fields.len(),
        }
    }

    /// Coerces a structurally valid record into endpoint order.
    pub fn prepare(
        &self,
        record: &Record,
        columns: Option<&ColumnIndex>,
    ) -> Result<PreparedRecord, String> {
        let values = match (self, columns) {
            (Schema::Positional(schema), _) => schema
                .fields
                .iter()
                .zip(&record.fields)
                .map(|(field, raw)| field.coerce(raw))
                .collect::<Result<Vec<_>, _>>()?,
            (Schema::Header(schema), Some(columns)) => schema
                .columns
                .iter()
                .zip(&columns.indices)
                .map(|(column, &index)| column.coerce(&record.fields[index]))
                .collect::<Result<Vec<_>, _>>()?,
            (Schema::Header(_), None) => {
                return Err("header has not been resolved".to_string());
            }
        };
        Ok(PreparedRecord {
            position: record.position,
            values,
        })
    }
}

/// Fields of an exchange-rate row.
pub const EXCHANGE_RATE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "SOURCE_CURRENCY",
        kind: FieldKind::Text,
        required: true,
        description: "ISO code of the currency being converted",
    },
    FieldSpec {
        name: "TARGET_CURRENCY",
        kind: FieldKind::Text,
        required: true,
        description: "ISO code of the currency converted into",
    },
    FieldSpec {
        name: "RATE",
        kind: FieldKind::Decimal,
        required: true,
        description: "Units of target currency per unit of source currency",
    },
    FieldSpec {
        name: "DATE",
        kind: FieldKind::Date,
        required: true,
        description: "Date the rate applies from",
    },
];

pub fn exchange_rate_schema() -> Schema {
    Schema::Positional(PositionalSchema {
        delimiter: b',',
        fields: EXCHANGE_RATE_FIELDS,
    })
}

pub fn cede_interface_schema() -> Schema {
    Schema::Header(HeaderSchema {
        delimiter: b';',
        columns: crate::domain::cede_columns::CEDE_INTERFACE_COLUMNS,
    })
}
