//! Companies, contacts, roles and users

use anyhow::{anyhow, bail};
use colored::Colorize;

use docdesk_forms::{ContactDraft, DeskUseCases, RoleEditor};

use super::Context;
use crate::output::{CompanyRow, ContactRow, RoleRow, UserRow};
use crate::{CompanyCommands, ContactCommands, RoleCommands, UserCommands};

pub async fn companies(action: CompanyCommands, ctx: &Context) -> anyhow::Result<()> {
    match action {
        CompanyCommands::List => {
            let companies = ctx.desk.list_companies().await?;
            let rows: Vec<CompanyRow> = companies.iter().map(CompanyRow::from).collect();
            ctx.format.print_rows(&rows)?;
        }
    }
    Ok(())
}

pub async fn contacts(action: ContactCommands, ctx: &Context) -> anyhow::Result<()> {
    match action {
        ContactCommands::List { user } => {
            let user_id = match user {
                Some(id) => id,
                None => ctx.desk.current_user().await?.id,
            };
            let contacts = ctx.desk.list_contacts(&user_id).await?;
            let rows: Vec<ContactRow> = contacts.iter().map(ContactRow::from).collect();
            ctx.format.print_rows(&rows)?;
        }
        ContactCommands::Create { name, email, phone, company } => {
            let user = ctx.desk.current_user().await?;
            let draft = ContactDraft {
                user_id: Some(user.id),
                name,
                email,
                phone,
                company_id: company,
                ..Default::default()
            };
            let contact = ctx.desk.save_contact(&draft).await?;
            println!("{} Created contact {} ({})", "✓".green(), contact.name, contact.id);
        }
        ContactCommands::Update { id, name, email, phone, company } => {
            let user = ctx.desk.current_user().await?;
            let contacts = ctx.desk.list_contacts(&user.id).await?;
            let existing = contacts
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| anyhow!("contact {} not found", id))?;

            let mut draft = ContactDraft::from_contact(existing);
            draft.user_id = Some(user.id);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(email) = email {
                draft.email = email;
            }
            if phone.is_some() {
                draft.phone = phone;
            }
            if company.is_some() {
                draft.company_id = company;
            }
            let contact = ctx.desk.save_contact(&draft).await?;
            println!("{} Updated contact {}", "✓".green(), contact.name);
        }
    }
    Ok(())
}

pub async fn roles(action: RoleCommands, ctx: &Context) -> anyhow::Result<()> {
    match action {
        RoleCommands::List => {
            let (roles, permissions) =
                tokio::try_join!(ctx.desk.list_roles(), ctx.desk.list_permissions())?;
            let rows: Vec<RoleRow> = roles.iter().map(|r| RoleRow::new(r, &permissions)).collect();
            ctx.format.print_rows(&rows)?;
        }
        RoleCommands::Permissions => {
            let permissions = ctx.desk.list_permissions().await?;
            let rows: Vec<CompanyRow> = permissions.iter().map(CompanyRow::from).collect();
            ctx.format.print_rows(&rows)?;
        }
        RoleCommands::Create { name, permissions } => {
            let available = ctx.desk.list_permissions().await?;
            let mut editor = RoleEditor::new(available);
            editor.name = name;
            toggle_permissions(&mut editor, &permissions)?;
            let role = ctx.desk.save_role(&editor).await?;
            println!("{} Created role {} ({})", "✓".green(), role.name, role.id);
        }
        RoleCommands::Edit { id, name, permissions } => {
            let (roles, available) =
                tokio::try_join!(ctx.desk.list_roles(), ctx.desk.list_permissions())?;
            let role = roles
                .iter()
                .find(|r| r.id == id)
                .ok_or_else(|| anyhow!("role {} not found", id))?;

            let mut editor = RoleEditor::from_role(role, available);
            if let Some(name) = name {
                editor.name = name;
            }
            toggle_permissions(&mut editor, &permissions)?;
            let role = ctx.desk.save_role(&editor).await?;
            println!(
                "{} Updated role {} ({})",
                "✓".green(),
                role.name,
                editor.permissions().summary()
            );
        }
    }
    Ok(())
}

fn toggle_permissions(editor: &mut RoleEditor, ids: &[String]) -> anyhow::Result<()> {
    for id in ids {
        if editor.permissions_mut().toggle(id).is_none() {
            bail!("unknown permission '{}'", id);
        }
    }
    Ok(())
}

pub async fn users(action: UserCommands, ctx: &Context) -> anyhow::Result<()> {
    match action {
        UserCommands::List => {
            let users = ctx.desk.list_users().await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            ctx.format.print_rows(&rows)?;
        }
    }
    Ok(())
}
