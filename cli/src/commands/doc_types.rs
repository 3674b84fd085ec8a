//! Document type commands

use std::path::Path;

use anyhow::{anyhow, bail, Context as _};
use colored::Colorize;
use serde::Deserialize;

use docdesk_forms::{DeskUseCases, DocTypeEditor, EnumOptionsEditor, FieldTypeId};

use super::{split_pair, Context};
use crate::output::{DocTypeRow, FieldRow, OutputFormat};
use crate::DocTypeCommands;

/// Document type definition file
#[derive(Debug, Default, Deserialize)]
pub struct Definition {
    pub name: Option<String>,
    pub alias: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_id: FieldTypeId,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

impl FieldSpec {
    /// `NAME:TYPE[:LENGTH][:required][:opt1|opt2]`
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut parts = raw.split(':').map(str::trim);
        let name = parts
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| anyhow!("field '{}' has no name", raw))?;
        let type_code = parts
            .next()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("field '{}' has no type", raw))?;

        let mut spec = Self {
            name: name.to_string(),
            type_id: FieldTypeId::from_code(type_code),
            length: None,
            precision: None,
            required: false,
            options: vec![],
        };
        for part in parts.filter(|p| !p.is_empty()) {
            if let Ok(length) = part.parse() {
                spec.length = Some(length);
            } else if part.eq_ignore_ascii_case("required") {
                spec.required = true;
            } else {
                spec.options.extend(part.split('|').map(|o| o.trim().to_string()));
            }
        }
        Ok(spec)
    }

    fn apply(self, editor: &mut DocTypeEditor) -> anyhow::Result<()> {
        if let FieldTypeId::Unrecognized(code) = &self.type_id {
            bail!("field '{}': unknown type '{}'", self.name, code);
        }
        let id = editor.add_field(self.name, self.type_id);
        let field = editor.field_mut(&id).ok_or_else(|| anyhow!("field vanished while editing"))?;
        field.length = self.length;
        field.precision = self.precision;
        field.is_required = self.required;
        if !self.options.is_empty() {
            *field.options_mut() = EnumOptionsEditor::normalize(self.options);
        }
        Ok(())
    }
}

fn read_definition(path: &Path) -> anyhow::Result<Definition> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    // YAML is a superset of JSON, one parser covers both
    serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn set_text(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

pub async fn handle(action: DocTypeCommands, ctx: &Context) -> anyhow::Result<()> {
    match action {
        DocTypeCommands::List => {
            let types = ctx.desk.list_doc_types().await?;
            let rows: Vec<DocTypeRow> = types.iter().map(DocTypeRow::from).collect();
            ctx.format.print_rows(&rows)?;
        }
        DocTypeCommands::Show { id } => {
            let schema = ctx.desk.get_doc_type(&id).await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("{} {} ({})", schema.name.bold(), schema.alias, schema.id);
                    if !schema.description.is_empty() {
                        println!("{}", schema.description);
                    }
                    let rows: Vec<FieldRow> = schema.fields().iter().map(FieldRow::from).collect();
                    ctx.format.print_rows(&rows)?;
                }
                format => format.print(&schema)?,
            }
        }
        DocTypeCommands::Create { name, alias, description, fields, definition } => {
            let file = match definition {
                Some(path) => read_definition(&path)?,
                None => Definition::default(),
            };

            let mut editor = DocTypeEditor::new(name.or(file.name).unwrap_or_default());
            set_text(&mut editor.alias, alias.or(file.alias));
            set_text(&mut editor.description, description.or(file.description));
            for spec in file.fields {
                spec.apply(&mut editor)?;
            }
            for raw in &fields {
                FieldSpec::parse(raw)?.apply(&mut editor)?;
            }
            save(ctx, &editor).await?;
        }
        DocTypeCommands::Edit {
            id,
            name,
            alias,
            description,
            add_fields,
            remove_fields,
            add_options,
            definition,
        } => {
            let schema = ctx.desk.get_doc_type(&id).await?;
            let mut editor = DocTypeEditor::from_schema(&schema);

            if let Some(path) = definition {
                let file = read_definition(&path)?;
                set_text(&mut editor.name, file.name);
                set_text(&mut editor.alias, file.alias);
                set_text(&mut editor.description, file.description);
                editor.clear_fields();
                for spec in file.fields {
                    spec.apply(&mut editor)?;
                }
            }
            set_text(&mut editor.name, name);
            set_text(&mut editor.alias, alias);
            set_text(&mut editor.description, description);

            for field_name in &remove_fields {
                let field_id = editor
                    .fields()
                    .iter()
                    .find(|f| f.name.trim().eq_ignore_ascii_case(field_name.trim()))
                    .map(|f| f.id.clone())
                    .ok_or_else(|| anyhow!("no field named '{}'", field_name))?;
                editor.remove_field(&field_id);
            }
            for raw in &add_fields {
                FieldSpec::parse(raw)?.apply(&mut editor)?;
            }
            for raw in &add_options {
                let (field_name, option) = split_pair(raw)?;
                let field = editor
                    .field_by_name_mut(field_name)
                    .ok_or_else(|| anyhow!("no field named '{}'", field_name))?;
                if !field.type_id.is_enumeration() {
                    bail!("field '{}' is not an enumeration", field_name);
                }
                let options = field.options_mut();
                let blank = options
                    .entries()
                    .iter()
                    .find(|e| e.value.trim().is_empty())
                    .map(|e| e.id);
                let row = blank.unwrap_or_else(|| options.add());
                options.update(row, option);
            }
            save(ctx, &editor).await?;
        }
    }
    Ok(())
}

async fn save(ctx: &Context, editor: &DocTypeEditor) -> anyhow::Result<()> {
    let (saved, warnings) = ctx.desk.save_doc_type(editor).await?;
    for warning in &warnings {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }
    let verb = if editor.is_new() { "Created" } else { "Updated" };
    println!("{} {} document type {} ({})", "✓".green(), verb, saved.name, saved.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_spec() {
        let spec = FieldSpec::parse("Color:enumeration:required:Red|Green").unwrap();
        assert_eq!(spec.type_id, FieldTypeId::Enumeration);
        assert!(spec.required);
        assert_eq!(spec.options, vec!["Red", "Green"]);

        let spec = FieldSpec::parse("Code : singleChar : 1").unwrap();
        assert_eq!(spec.name, "Code");
        assert_eq!(spec.type_id, FieldTypeId::SingleChar);
        assert_eq!(spec.length, Some(1));

        assert!(FieldSpec::parse(":date").is_err());
        assert!(FieldSpec::parse("Due").is_err());
    }

    #[test]
    fn test_definition_file_builds_editor() {
        let yaml = concat!(
            "name: Invoice\n",
            "fields:\n",
            "  - name: Total\n",
            "    type: currency\n",
            "    required: true\n",
            "  - name: Status\n",
            "    type: enumeration\n",
            "    options: [Open, Paid]\n",
        );
        let definition: Definition = serde_yaml::from_str(yaml).unwrap();

        let mut editor = DocTypeEditor::new(definition.name.clone().unwrap_or_default());
        for spec in definition.fields {
            spec.apply(&mut editor).unwrap();
        }
        let (draft, warnings) = editor.build().unwrap();
        assert!(warnings.is_empty());
        assert_eq!(draft.fields.len(), 2);
        assert!(draft.fields[0].is_required);
        assert_eq!(draft.fields[1].specific_values.len(), 2);
    }

    #[test]
    fn test_unknown_type_is_refused() {
        let mut editor = DocTypeEditor::new("X");
        assert!(FieldSpec::parse("A:blob").unwrap().apply(&mut editor).is_err());
    }
}
