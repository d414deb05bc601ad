//! Typed views of one report item: the lenient `RawRecord` read from the API
//! payload and the `FlatRow` produced by flattening.

use serde_json::Value;

/// Raw `viewTime` as the server sent it. Coerced to a number during flattening.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ViewTimeRaw {
    /// Key not present; counts as 0 seconds.
    #[default]
    Missing,
    Null,
    Number(f64),
    Text(String),
    /// Bool, object or array.
    Other,
}

/// Nested `externalOpportunity` mapping (CRM ids and names).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExternalOpportunity {
    pub account_id: Option<String>,
    pub opportunity_id: Option<String>,
    pub account_name: Option<String>,
    pub opportunity_name: Option<String>,
}

/// One item from `data.items`. Missing or null fields are `None`; unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    pub senddemo_uuid: Option<String>,
    pub demoboard_name: Option<String>,
    pub organization: Option<String>,
    pub view_time: ViewTimeRaw,
    pub time_last_view: Option<String>,
    pub external_opportunity: ExternalOpportunity,
    /// Session ids, in server order. A non-array value reads as empty.
    pub demo_uuids: Vec<Option<String>>,
    /// Single fallback session id used when `demo_uuids` is empty.
    pub demo_uuid: Option<String>,
}

impl RawRecord {
    /// Best-effort extraction; never fails. A non-object value yields an all-default record.
    pub fn from_value(v: &Value) -> Self {
        let ext = v.get("externalOpportunity").filter(|x| x.is_object());
        let ext_text = |key: &str| ext.and_then(|e| text_field(e, key));

        let demo_uuids = match v.get("demoUuids") {
            Some(Value::Array(ids)) => ids.iter().map(scalar_text).collect(),
            _ => Vec::new(),
        };

        Self {
            senddemo_uuid: text_field(v, "senddemoUuid"),
            demoboard_name: text_field(v, "demoboardName"),
            organization: text_field(v, "organization"),
            view_time: match v.get("viewTime") {
                None => ViewTimeRaw::Missing,
                Some(Value::Null) => ViewTimeRaw::Null,
                Some(Value::Number(n)) => n.as_f64().map(ViewTimeRaw::Number).unwrap_or(ViewTimeRaw::Other),
                Some(Value::String(s)) => ViewTimeRaw::Text(s.clone()),
                Some(_) => ViewTimeRaw::Other,
            },
            time_last_view: text_field(v, "timeLastView"),
            external_opportunity: ExternalOpportunity {
                account_id: ext_text("externalAccountId"),
                opportunity_id: ext_text("externalOpportunityId"),
                account_name: ext_text("externalAccountName"),
                opportunity_name: ext_text("externalOpportunityName"),
            },
            demo_uuids,
            demo_uuid: text_field(v, "demoUuid"),
        }
    }
}

/// Read `key` from an object as text. Null and absent are `None`.
fn text_field(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(scalar_text)
}

/// Render a JSON value as cell text: strings verbatim, other scalars by their
/// JSON text, containers as compact JSON.
fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Column names of the detail export, in order.
pub const FLAT_COLUMNS: [&str; 10] = [
    "senddemoUuid",
    "demoboardName",
    "organization",
    "viewTime",
    "timeLastView",
    "externalAccountId",
    "externalOpportunityId",
    "externalAccountName",
    "externalOpportunityName",
    "demoUuids",
];

/// One output row: record fields plus a single expanded session id.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatRow {
    pub senddemo_uuid: String,
    pub demoboard_name: String,
    pub organization: String,
    /// `None` when the server value could not be read as a number.
    pub view_time: Option<f64>,
    pub time_last_view: String,
    pub external_account_id: String,
    pub external_opportunity_id: String,
    pub external_account_name: String,
    pub external_opportunity_name: String,
    /// Expanded scalar from `demoUuids` (or the `demoUuid` fallback). Exported as `demoUuids`.
    pub demo_uuid: String,
}

impl FlatRow {
    /// Text cells for every column except `viewTime`, in `FLAT_COLUMNS` order.
    pub(crate) fn text_fields_mut(&mut self) -> [&mut String; 9] {
        [
            &mut self.senddemo_uuid,
            &mut self.demoboard_name,
            &mut self.organization,
            &mut self.time_last_view,
            &mut self.external_account_id,
            &mut self.external_opportunity_id,
            &mut self.external_account_name,
            &mut self.external_opportunity_name,
            &mut self.demo_uuid,
        ]
    }

    pub fn is_blank(&self) -> bool {
        self.view_time.is_none()
            && [
                &self.senddemo_uuid,
                &self.demoboard_name,
                &self.organization,
                &self.time_last_view,
                &self.external_account_id,
                &self.external_opportunity_id,
                &self.external_account_name,
                &self.external_opportunity_name,
                &self.demo_uuid,
            ]
            .iter()
            .all(|s| s.is_empty())
    }

    /// Cells in `FLAT_COLUMNS` order.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.senddemo_uuid.clone(),
            self.demoboard_name.clone(),
            self.organization.clone(),
            format_view_time(self.view_time),
            self.time_last_view.clone(),
            self.external_account_id.clone(),
            self.external_opportunity_id.clone(),
            self.external_account_name.clone(),
            self.external_opportunity_name.clone(),
            self.demo_uuid.clone(),
        ]
    }
}

/// Whole seconds print without a fraction (`42`), unknown prints empty.
pub fn format_view_time(v: Option<f64>) -> String {
    match v {
        None => String::new(),
        Some(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => format!("{}", x as i64),
        Some(x) => format!("{}", x),
    }
}
