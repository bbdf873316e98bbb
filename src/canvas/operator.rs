use serde::{Deserialize, Serialize};

/// A typed pipeline stage placed on the canvas.
///
/// The `kind` carries the per-type configuration and doubles as the dispatch
/// tag for evaluation and SQL generation, so adding an operator kind without
/// handling it everywhere is a compile error rather than a runtime surprise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub status: OperatorStatus,
    #[serde(flatten)]
    pub kind: OperatorKind,
}

impl Operator {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: OperatorKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: Position::default(),
            size: Size::default(),
            status: OperatorStatus::Unconfigured,
            kind,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorStatus {
    Idle,
    #[default]
    Unconfigured,
    Configured,
    Running,
    Succeeded,
    Failed,
}

/// The closed set of operator kinds, tagged by `type` in the persisted JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OperatorKind {
    Source(SourceConfig),
    Filter(FilterConfig),
    Join(JoinConfig),
    Aggregate(AggregateConfig),
    Select(SelectConfig),
    Union(UnionConfig),
    Sort(SortConfig),
    Limit(LimitConfig),
    Analyze(AnalyzeConfig),
}

impl OperatorKind {
    /// The tag string, for log and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            OperatorKind::Source(_) => "source",
            OperatorKind::Filter(_) => "filter",
            OperatorKind::Join(_) => "join",
            OperatorKind::Aggregate(_) => "aggregate",
            OperatorKind::Select(_) => "select",
            OperatorKind::Union(_) => "union",
            OperatorKind::Sort(_) => "sort",
            OperatorKind::Limit(_) => "limit",
            OperatorKind::Analyze(_) => "analyze",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Descriptor handed to the `TableProvider`; a table name in the sample
    /// provider, a connection string elsewhere.
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub available_columns: Vec<String>,
    /// Projection applied after the fetch. Empty means all columns.
    #[serde(default)]
    pub selected_columns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    #[serde(rename = "operator")]
    pub op: CompareOp,
    pub value: String,
}

/// Filter comparison operators.
///
/// Deserialization is lenient: an unrecognized symbol becomes
/// [`CompareOp::Unknown`], which the evaluator treats as always-true with a
/// warning, matching the per-row leniency policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Like,
    NotLike,
    In,
    NotIn,
    Unknown(String),
}

impl CompareOp {
    pub fn symbol(&self) -> &str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Like => "LIKE",
            CompareOp::NotLike => "NOT LIKE",
            CompareOp::In => "IN",
            CompareOp::NotIn => "NOT IN",
            CompareOp::Unknown(s) => s,
        }
    }
}

impl From<String> for CompareOp {
    fn from(s: String) -> Self {
        match s.as_str() {
            "=" => CompareOp::Eq,
            "!=" => CompareOp::Ne,
            ">" => CompareOp::Gt,
            "<" => CompareOp::Lt,
            ">=" => CompareOp::Ge,
            "<=" => CompareOp::Le,
            "LIKE" => CompareOp::Like,
            "NOT LIKE" => CompareOp::NotLike,
            "IN" => CompareOp::In,
            "NOT IN" => CompareOp::NotIn,
            _ => CompareOp::Unknown(s),
        }
    }
}

impl From<CompareOp> for String {
    fn from(op: CompareOp) -> Self {
        op.symbol().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinConfig {
    #[serde(default)]
    pub join_type: JoinType,
    #[serde(default)]
    pub left_key: Option<String>,
    #[serde(default)]
    pub right_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateConfig {
    #[serde(default)]
    pub group_by_fields: Vec<String>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub field: String,
    pub function: AggregateFn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Aggregation {
    /// Output column name: the alias, or `{function}_{field}` lowercase.
    pub fn output_column(&self) -> String {
        self.alias.clone().unwrap_or_else(|| {
            format!("{}_{}", self.function.as_sql().to_lowercase(), self.field)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFn {
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl AggregateFn {
    pub fn as_sql(&self) -> &'static str {
        match self {
            AggregateFn::Sum => "SUM",
            AggregateFn::Avg => "AVG",
            AggregateFn::Min => "MIN",
            AggregateFn::Max => "MAX",
            AggregateFn::Count => "COUNT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectConfig {
    #[serde(default)]
    pub selected_columns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnionConfig {
    #[serde(default)]
    pub distinct: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortConfig {
    #[serde(default)]
    pub sort_fields: Vec<SortField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitConfig {
    /// Zero, negative or absent means pass-through.
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub direction: LimitDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitDirection {
    #[default]
    Top,
    Bottom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeConfig {
    #[serde(default)]
    pub analysis_type: Option<AnalysisType>,
    #[serde(default)]
    pub text_field: Option<String>,
}

/// Text-analysis kinds. Like [`CompareOp`], deserialization is lenient: an
/// unrecognized kind becomes [`AnalysisType::Unsupported`] and the analyze
/// operator renders "Analysis not supported" for it instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnalysisType {
    Sentiment,
    Keyword,
    Entity,
    Language,
    Unsupported(String),
}

impl AnalysisType {
    /// The tag used in the output column name, `{tag}_result`.
    pub fn tag(&self) -> &str {
        match self {
            AnalysisType::Sentiment => "sentiment",
            AnalysisType::Keyword => "keyword",
            AnalysisType::Entity => "entity",
            AnalysisType::Language => "language",
            AnalysisType::Unsupported(s) => s,
        }
    }
}

impl From<String> for AnalysisType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "sentiment" => AnalysisType::Sentiment,
            "keyword" | "keywords" => AnalysisType::Keyword,
            "entity" | "entities" => AnalysisType::Entity,
            "language" => AnalysisType::Language,
            _ => AnalysisType::Unsupported(s),
        }
    }
}

impl From<AnalysisType> for String {
    fn from(kind: AnalysisType) -> Self {
        kind.tag().to_string()
    }
}
