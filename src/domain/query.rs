use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq(String, String),
    Gte(String, String),
    Lte(String, String),
    In(String, Vec<String>),
    /// `*` 為萬用字元
    Like(String, String),
}

impl Predicate {
    pub fn column(&self) -> &str {
        match self {
            Predicate::Eq(c, _)
            | Predicate::Gte(c, _)
            | Predicate::Lte(c, _)
            | Predicate::In(c, _)
            | Predicate::Like(c, _) => c,
        }
    }

    /// PostgREST 查詢參數，例如 `("branch_id", "eq.b1")`
    pub fn to_param(&self) -> (String, String) {
        let value = match self {
            Predicate::Eq(_, v) => format!("eq.{}", v),
            Predicate::Gte(_, v) => format!("gte.{}", v),
            Predicate::Lte(_, v) => format!("lte.{}", v),
            Predicate::Like(_, v) => format!("like.{}", v),
            Predicate::In(_, values) => {
                let quoted: Vec<String> = values
                    .iter()
                    .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
                    .collect();
                format!("in.({})", quoted.join(","))
            }
        };
        (self.column().to_string(), value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// One list query against the data service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQuery {
    pub table: String,
    pub select: String,
    pub predicates: Vec<Predicate>,
    pub order: Vec<OrderBy>,
}

impl DataQuery {
    pub fn new(table: impl Into<String>, select: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: select.into(),
            predicates: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.select.clone())];
        pairs.extend(self.predicates.iter().map(Predicate::to_param));

        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| match o.direction {
                    Direction::Asc => format!("{}.asc", o.column),
                    Direction::Desc => format!("{}.desc", o.column),
                })
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("order".to_string(), order));
        }

        pairs
    }
}

/// Table names on the data service; overridable from the `[tables]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub employees: String,
    pub branches: String,
    pub leaves: String,
    pub leave_types: String,
    pub employee_documents: String,
    pub document_categories: String,
    pub compliance_records: String,
    pub compliance_types: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            employees: "employees".to_string(),
            branches: "branches".to_string(),
            leaves: "leave_requests".to_string(),
            leave_types: "leave_types".to_string(),
            employee_documents: "employee_documents".to_string(),
            document_categories: "document_categories".to_string(),
            compliance_records: "compliance_records".to_string(),
            compliance_types: "compliance_types".to_string(),
        }
    }
}
