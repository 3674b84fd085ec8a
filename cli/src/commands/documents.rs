//! Document commands

use std::path::Path;

use anyhow::{anyhow, bail, Context as _};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

use docdesk_forms::application::dto::Attachment;
use docdesk_forms::domain::services::widget::check_form;
use docdesk_forms::domain::value_objects::normalize_flag;
use docdesk_forms::{
    DeskUseCases, DocumentModal, DocumentQuery, FormMode, RawValue, SendDocumentsForm,
    SortDirection, SortKey,
};

use super::{split_pair, Context};
use crate::output::{DocumentRow, OutputFormat, ValueRow};
use crate::DocumentCommands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Name,
    Created,
    Id,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Created => SortKey::Created,
            SortArg::Id => SortKey::Id,
        }
    }
}

#[derive(Serialize)]
struct DocumentView {
    id: Option<String>,
    file_name: Option<String>,
    companies: String,
    values: Vec<ValueRow>,
}

pub async fn handle(action: DocumentCommands, ctx: &Context) -> anyhow::Result<()> {
    match action {
        DocumentCommands::List { type_id, search, sort, desc } => {
            let direction = if desc { SortDirection::Descending } else { SortDirection::Ascending };
            let mut query = DocumentQuery::new()
                .sort_by(sort.map(SortKey::from).unwrap_or_default(), direction);
            if let Some(term) = search {
                query = query.search(term);
            }
            let documents = ctx.desk.list_documents(&type_id, &query).await?;
            let rows: Vec<DocumentRow> = documents.iter().map(DocumentRow::from).collect();
            ctx.format.print_rows(&rows)?;
        }
        DocumentCommands::Show { id } => {
            let mut modal = DocumentModal::new();
            ctx.desk.open_existing(&mut modal, &id, FormMode::View).await?;
            let view = DocumentView {
                id: modal.document_id().map(str::to_string),
                file_name: modal.file_name().map(str::to_string),
                companies: modal.companies().map(|c| c.summary()).unwrap_or_default(),
                values: modal
                    .rows()
                    .into_iter()
                    .map(|(field, value)| ValueRow::new(field, value))
                    .collect(),
            };
            match ctx.format {
                OutputFormat::Table => {
                    println!("{} {}", "Document".bold(), view.id.as_deref().unwrap_or_default());
                    println!("File:      {}", view.file_name.as_deref().unwrap_or("-"));
                    println!("Companies: {}", view.companies);
                    ctx.format.print_rows(&view.values)?;
                }
                format => format.print(&view)?,
            }
        }
        DocumentCommands::Create { type_id, file, values, companies } => {
            let mut modal = DocumentModal::new();
            ctx.desk.open_create(&mut modal, &type_id).await?;
            fill(&mut modal, &values, &companies)?;
            modal.attach(read_attachment(&file)?)?;
            submit(ctx, &mut modal).await?;
        }
        DocumentCommands::Edit { id, file, values, companies } => {
            let mut modal = DocumentModal::new();
            ctx.desk.open_existing(&mut modal, &id, FormMode::Edit).await?;
            fill(&mut modal, &values, &companies)?;
            if let Some(path) = file {
                modal.attach(read_attachment(&path)?)?;
            }
            submit(ctx, &mut modal).await?;
        }
        DocumentCommands::Send { documents, from, to, recipients, subject, message, company } => {
            let mut form = SendDocumentsForm::new(documents);
            form.from = from;
            form.company_id = company;
            form.subject = subject;
            form.message = message;
            for address in to.iter().flat_map(|raw| SendDocumentsForm::split_addresses(raw)) {
                form.add_to(address);
            }
            for address in recipients
                .iter()
                .flat_map(|raw| SendDocumentsForm::split_addresses(raw))
            {
                form.add_recipient(address);
            }
            ctx.desk.send_documents(&form).await?;
            println!("{} Sent {} document(s)", "✓".green(), form.document_ids.len());
        }
    }
    Ok(())
}

/// Apply `FIELD=VALUE` pairs and company toggles to the open form
fn fill(modal: &mut DocumentModal, values: &[String], companies: &[String]) -> anyhow::Result<()> {
    for raw in values {
        let (name, value) = split_pair(raw)?;
        let is_boolean = modal
            .schema()
            .and_then(|schema| schema.field_by_name(name))
            .map(|field| field.type_id.is_boolean())
            .unwrap_or(false);
        let raw_value = if is_boolean {
            RawValue::Flag(parse_flag(value))
        } else {
            RawValue::from(value)
        };
        modal.set_field_by_name(name, raw_value).with_context(|| format!("setting {}", name))?;
    }
    for company in companies {
        match modal.toggle_company(company)? {
            Some(selected) => tracing::debug!("Company {} selected: {}", company, selected),
            None => bail!("unknown company '{}'", company),
        }
    }
    Ok(())
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("on")
        || normalize_flag(&serde_json::Value::String(value.to_string()))
}

fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("{} has no file name", path.display()))?;
    let attachment = Attachment::new(file_name, bytes);
    Ok(match content_type(path) {
        Some(mime) => attachment.with_content_type(mime),
        None => attachment,
    })
}

fn content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => return None,
    })
}

async fn submit(ctx: &Context, modal: &mut DocumentModal) -> anyhow::Result<()> {
    if let (Some(schema), Some(state)) = (modal.schema(), modal.state()) {
        let problems = check_form(schema, state);
        if !problems.is_empty() {
            for problem in &problems {
                eprintln!("  {} {}", "✗".red(), problem);
            }
            bail!("{} field(s) need attention", problems.len());
        }
    }

    if let Some(token) = modal.cancel_token() {
        ctx.link(token);
    }
    let document = ctx.desk.submit(modal).await?;
    println!("{} Saved document {}", "✓".green(), document.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag("Yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("no"));
    }

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type(Path::new("a/Invoice.PDF")), Some("application/pdf"));
        assert_eq!(content_type(Path::new("scan.jpeg")), Some("image/jpeg"));
        assert_eq!(content_type(Path::new("archive.zst")), None);
        assert_eq!(content_type(Path::new("README")), None);
    }

    #[test]
    fn test_sort_arg_maps_to_key() {
        assert_eq!(SortKey::from(SortArg::Created), SortKey::Created);
    }
}
