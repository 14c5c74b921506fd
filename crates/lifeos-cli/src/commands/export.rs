use super::{open_session, print_json, CmdResult};

pub fn run() -> CmdResult {
    let (store, session) = open_session()?;
    let data = store.export_user_data(&session.id)?;
    tracing::info!(user_id = %session.id, tasks = data.tasks.len(), "exported user data");
    print_json(&data)?;
    Ok(())
}
