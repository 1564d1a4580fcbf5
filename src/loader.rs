//! JSON document loading.
//!
//! Work centers and work orders arrive as document envelopes:
//!
//! ```json
//! { "docId": "...", "docType": "workCenter", "data": { ... } }
//! ```
//!
//! The loader checks each envelope's `docType`, parses ISO-8601 instants,
//! and converts the payloads into the domain models.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{MaintenanceWindow, Shift, WorkCenter, WorkOrder};

/// Expected `docType` for work center documents.
const WORK_CENTER_DOC_TYPE: &str = "workCenter";
/// Expected `docType` for work order documents.
const WORK_ORDER_DOC_TYPE: &str = "workOrder";

/// Errors raised while loading input documents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or does not match the document shape.
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// A document carries the wrong `docType`.
    #[error("document '{doc_id}' has docType '{doc_type}', expected '{expected}'")]
    UnexpectedDocType {
        doc_id: String,
        doc_type: String,
        expected: &'static str,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document<T> {
    doc_id: String,
    doc_type: String,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkCenterData {
    name: String,
    #[serde(default)]
    shifts: Vec<ShiftData>,
    #[serde(default)]
    maintenance_windows: Vec<MaintenanceWindowData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShiftData {
    day_of_week: u8,
    start_hour: u32,
    end_hour: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MaintenanceWindowData {
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkOrderData {
    work_order_number: String,
    #[serde(default)]
    manufacturing_order_id: Option<String>,
    work_center_id: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    duration_minutes: i64,
    #[serde(default)]
    is_maintenance: bool,
    #[serde(default)]
    depends_on_work_order_ids: Vec<String>,
}

fn check_doc_type<T>(doc: &Document<T>, expected: &'static str) -> Result<(), LoadError> {
    if doc.doc_type == expected {
        Ok(())
    } else {
        Err(LoadError::UnexpectedDocType {
            doc_id: doc.doc_id.clone(),
            doc_type: doc.doc_type.clone(),
            expected,
        })
    }
}

/// Parses work center documents from a JSON array.
pub fn work_centers_from_json(json: &str) -> Result<Vec<WorkCenter>, LoadError> {
    let docs: Vec<Document<WorkCenterData>> = serde_json::from_str(json)?;
    docs.into_iter()
        .map(|doc| {
            check_doc_type(&doc, WORK_CENTER_DOC_TYPE)?;
            let mut center = WorkCenter::new(doc.doc_id).with_name(doc.data.name);
            for shift in doc.data.shifts {
                center =
                    center.with_shift(Shift::new(shift.day_of_week, shift.start_hour, shift.end_hour));
            }
            for window in doc.data.maintenance_windows {
                let mut mw = MaintenanceWindow::new(window.start_date, window.end_date);
                if let Some(reason) = window.reason {
                    mw = mw.with_reason(reason);
                }
                center = center.with_maintenance(mw);
            }
            Ok(center)
        })
        .collect()
}

/// Parses work order documents from a JSON array.
pub fn work_orders_from_json(json: &str) -> Result<Vec<WorkOrder>, LoadError> {
    let docs: Vec<Document<WorkOrderData>> = serde_json::from_str(json)?;
    docs.into_iter()
        .map(|doc| {
            check_doc_type(&doc, WORK_ORDER_DOC_TYPE)?;
            let data = doc.data;
            let mut order = WorkOrder::new(
                doc.doc_id,
                data.work_center_id,
                data.start_date,
                data.duration_minutes,
            )
            .with_number(data.work_order_number)
            .with_end(data.end_date);
            order.is_maintenance = data.is_maintenance;
            order.depends_on = data.depends_on_work_order_ids;
            order.manufacturing_order_id = data.manufacturing_order_id;
            Ok(order)
        })
        .collect()
}

/// Loads work center documents from a file.
pub fn load_work_centers(path: impl AsRef<Path>) -> Result<Vec<WorkCenter>, LoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    work_centers_from_json(&json)
}

/// Loads work order documents from a file.
pub fn load_work_orders(path: impl AsRef<Path>) -> Result<Vec<WorkOrder>, LoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    work_orders_from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER_JSON: &str = r#"[
        {
            "docId": "WC1",
            "docType": "workCenter",
            "data": {
                "name": "Lathe 1",
                "shifts": [
                    { "dayOfWeek": 1, "startHour": 8, "endHour": 16 },
                    { "dayOfWeek": 2, "startHour": 8, "endHour": 16 }
                ],
                "maintenanceWindows": [
                    {
                        "startDate": "2024-01-01T10:00:00Z",
                        "endDate": "2024-01-01T11:00:00Z",
                        "reason": "calibration"
                    }
                ]
            }
        }
    ]"#;

    const ORDER_JSON: &str = r#"[
        {
            "docId": "A",
            "docType": "workOrder",
            "data": {
                "workOrderNumber": "WO-0001",
                "manufacturingOrderId": "MO-7",
                "workCenterId": "WC1",
                "startDate": "2024-01-01T09:00:00Z",
                "endDate": "2024-01-01T11:00:00Z",
                "durationMinutes": 120,
                "isMaintenance": false,
                "dependsOnWorkOrderIds": ["B"]
            }
        }
    ]"#;

    #[test]
    fn test_load_work_centers() {
        let centers = work_centers_from_json(CENTER_JSON).unwrap();
        assert_eq!(centers.len(), 1);

        let wc = &centers[0];
        assert_eq!(wc.id, "WC1");
        assert_eq!(wc.name, "Lathe 1");
        assert_eq!(wc.shifts.len(), 2);
        assert_eq!(wc.shifts[0].start_hour, 8);
        assert_eq!(wc.maintenance_windows.len(), 1);
        assert_eq!(
            wc.maintenance_windows[0].reason.as_deref(),
            Some("calibration")
        );
    }

    #[test]
    fn test_load_work_orders() {
        let orders = work_orders_from_json(ORDER_JSON).unwrap();
        assert_eq!(orders.len(), 1);

        let wo = &orders[0];
        assert_eq!(wo.id, "A");
        assert_eq!(wo.number, "WO-0001");
        assert_eq!(wo.manufacturing_order_id.as_deref(), Some("MO-7"));
        assert_eq!(wo.work_center_id, "WC1");
        assert_eq!(wo.start, "2024-01-01T09:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(wo.duration_minutes, 120);
        assert!(!wo.is_maintenance);
        assert_eq!(wo.depends_on, vec!["B"]);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"[
            {
                "docId": "A",
                "docType": "workOrder",
                "data": {
                    "workOrderNumber": "WO-0001",
                    "workCenterId": "WC1",
                    "startDate": "2024-01-01T09:00:00Z",
                    "endDate": "2024-01-01T10:00:00Z",
                    "durationMinutes": 60
                }
            }
        ]"#;
        let orders = work_orders_from_json(json).unwrap();
        assert!(!orders[0].is_maintenance);
        assert!(orders[0].depends_on.is_empty());
        assert!(orders[0].manufacturing_order_id.is_none());
    }

    #[test]
    fn test_wrong_doc_type_rejected() {
        let json = r#"[
            {
                "docId": "A",
                "docType": "workCenter",
                "data": {
                    "workOrderNumber": "WO-0001",
                    "workCenterId": "WC1",
                    "startDate": "2024-01-01T09:00:00Z",
                    "endDate": "2024-01-01T10:00:00Z",
                    "durationMinutes": 60
                }
            }
        ]"#;
        let err = work_orders_from_json(json).unwrap_err();
        assert!(matches!(err, LoadError::UnexpectedDocType { .. }));
    }

    #[test]
    fn test_invalid_instant_rejected() {
        let json = r#"[
            {
                "docId": "A",
                "docType": "workOrder",
                "data": {
                    "workOrderNumber": "WO-0001",
                    "workCenterId": "WC1",
                    "startDate": "not-a-date",
                    "endDate": "2024-01-01T10:00:00Z",
                    "durationMinutes": 60
                }
            }
        ]"#;
        assert!(matches!(
            work_orders_from_json(json).unwrap_err(),
            LoadError::Json(_)
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_work_centers("/nonexistent/centers.json").unwrap_err(),
            LoadError::Io { .. }
        ));
    }
}
