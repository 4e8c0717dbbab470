use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::analysis::UpdatePatch;
use crate::auth::AuthenticatedUser;
use crate::export::{self, ExportError};
use crate::server::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// Classify one text and persist the result for the caller.
pub async fn analyze_text(
    request: web::Json<AnalyzeRequest>,
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> impl Responder {
    match state.pipeline.analyze(&user.username, &request.text).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => {
            log::error!("Analysis failed for '{}': {}", user.username, e);
            HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
        }
    }
}

/// List the caller's most recent records, newest first, capped.
pub async fn get_history(user: AuthenticatedUser, state: web::Data<AppState>) -> impl Responder {
    match state
        .db
        .list_for_owner(&user.username, state.config.history_limit)
    {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => {
            log::error!("History listing failed for '{}': {}", user.username, e);
            HttpResponse::InternalServerError()
                .json(json!({"error": "Failed to list analysis history"}))
        }
    }
}

/// Delete one record by its `id`, scoped to the caller's ownership.
pub async fn delete_analysis(
    path: web::Path<String>,
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = path.into_inner();
    match state.db.delete_record(&user.username, &id) {
        Ok(true) => {
            HttpResponse::Ok().json(json!({"status": "success", "message": "Record deleted"}))
        }
        Ok(false) => HttpResponse::NotFound().json(json!({"error": "Record not found"})),
        Err(e) => {
            log::error!("Delete failed for '{}': {}", user.username, e);
            HttpResponse::InternalServerError().json(json!({"error": "Failed to delete record"}))
        }
    }
}

/// Partially update one record by its `id`, scoped to the caller's ownership.
pub async fn update_analysis(
    path: web::Path<String>,
    data: web::Json<UpdatePatch>,
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = path.into_inner();
    let patch = data.into_inner();

    if patch.is_empty() {
        return HttpResponse::BadRequest().json(json!({"error": "No valid data fields provided"}));
    }

    match state.db.update_record(&user.username, &id, &patch) {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        // absence and foreign ownership answer the same way
        Ok(None) => {
            HttpResponse::NotFound().json(json!({"error": "Record not found or access denied"}))
        }
        Err(e) => {
            log::error!("Update failed for '{}': {}", user.username, e);
            HttpResponse::InternalServerError().json(json!({"error": "Failed to update record"}))
        }
    }
}

/// Batch-classify the rows of an uploaded CSV document (first column, header
/// row). Returns the records that were successfully created.
pub async fn batch_analyze(
    body: web::Bytes,
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> impl Responder {
    let rows = match parse_csv_rows(&body) {
        Ok(rows) => rows,
        Err(msg) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("Failed to parse CSV: {}", msg)}))
        }
    };

    let records = state.pipeline.analyze_batch(&user.username, &rows).await;
    HttpResponse::Ok().json(records)
}

/// Extracts the first-column cells of a CSV document, header row excluded.
fn parse_csv_rows(bytes: &[u8]) -> Result<Vec<String>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        rows.push(record.get(0).unwrap_or("").to_string());
    }

    if rows.is_empty() {
        return Err("CSV is empty".to_string());
    }
    Ok(rows)
}

/// Export the caller's full history as a styled spreadsheet.
pub async fn export_excel(user: AuthenticatedUser, state: web::Data<AppState>) -> impl Responder {
    let records = match state.db.records_for_export(&user.username) {
        Ok(records) => records,
        Err(e) => {
            log::error!("Export query failed for '{}': {}", user.username, e);
            return HttpResponse::InternalServerError()
                .json(json!({"error": "Failed to export records"}));
        }
    };

    match export::build_workbook(&records) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"analysis_export.xlsx\"",
            ))
            .body(bytes),
        Err(ExportError::NoRecords) => {
            HttpResponse::NotFound().json(json!({"error": "No records to export"}))
        }
        Err(e) => {
            log::error!("Workbook generation failed for '{}': {}", user.username, e);
            HttpResponse::InternalServerError().json(json!({"error": "Failed to export records"}))
        }
    }
}
