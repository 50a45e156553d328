use crate::domain::lead::Lead;
use crate::domain::queues::SmartQueue;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::Workbook;

/// Builds an xlsx of one smart queue and wraps it in a download response.
pub fn export_queue_xlsx(leads: &[Lead], queue: SmartQueue) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = [
        "Name",
        "Phone",
        "Email",
        "Score",
        "Status",
        "Attempts",
        "Callback",
        "Source",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, lead) in leads.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, lead.full_name())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write name: {}", e)))?;

        worksheet
            .write_string(r, 1, lead.phone.as_deref().unwrap_or(""))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write phone: {}", e)))?;

        worksheet
            .write_string(r, 2, lead.email.as_deref().unwrap_or(""))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write email: {}", e)))?;

        worksheet
            .write_number(r, 3, lead.score as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write score: {}", e)))?;

        worksheet
            .write_string(r, 4, lead.status.as_str())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write status: {}", e)))?;

        worksheet
            .write_number(r, 5, lead.call_attempts as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write attempts: {}", e)))?;

        let callback = lead
            .next_callback_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        worksheet
            .write_string(r, 6, callback)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write callback: {}", e)))?;

        worksheet
            .write_string(r, 7, lead.source.as_deref().unwrap_or(""))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write source: {}", e)))?;
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to build workbook: {}", e)))?;

    xlsx_response(buffer, &format!("queue_{}.xlsx", queue.as_str()))
}
