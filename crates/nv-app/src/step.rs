//! Navigation steps given on the command line

use std::str::FromStr;

use anyhow::Result;
use nv_core::{NavigationOutcome, Paginator, SortRequest};

/// One paginator operation, written as `first`, `next`, `jump:2.1`, `sort:3:desc` ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    First,
    Next,
    Previous,
    Last,
    Refresh,
    Jump(String),
    Sort(SortRequest),
    Unsort,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match text.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (text, None),
        };

        match (name.to_ascii_lowercase().as_str(), arg) {
            ("first", None) => Ok(Step::First),
            ("next", None) => Ok(Step::Next),
            ("prev" | "previous", None) => Ok(Step::Previous),
            ("last", None) => Ok(Step::Last),
            ("refresh", None) => Ok(Step::Refresh),
            ("unsort", None) => Ok(Step::Unsort),
            ("jump", Some(key)) if !key.is_empty() => Ok(Step::Jump(key.to_string())),
            ("sort", Some(spec)) => {
                let (column, descending) = match spec.split_once(':') {
                    Some((column, "desc")) => (column, true),
                    Some((column, "asc")) => (column, false),
                    Some((_, direction)) => return Err(format!("unknown sort direction '{direction}'")),
                    None => (spec, false),
                };
                let column_order = column
                    .parse()
                    .map_err(|_| format!("invalid sort column '{column}'"))?;
                Ok(Step::Sort(SortRequest { column_order, descending }))
            }
            _ => Err(format!("unknown step '{text}'")),
        }
    }
}

impl Step {
    pub async fn run(&self, pager: &Paginator) -> Result<NavigationOutcome> {
        let outcome = match self {
            Step::First => pager.first().await?,
            Step::Next => pager.next().await?,
            Step::Previous => pager.previous().await?,
            Step::Last => pager.last().await?,
            Step::Refresh => pager.refresh().await?,
            Step::Jump(key) => pager.jump_to(key).await?,
            Step::Sort(sort) => pager.resort(Some(sort.clone())).await?,
            Step::Unsort => pager.resort(None).await?,
        };
        Ok(outcome)
    }
}
