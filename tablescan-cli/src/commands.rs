//! Subcommand handlers.

use std::path::PathBuf;

use tablescan_lib::TablescanClient;
use tablescan_lib::api::ImageUpload;
use tablescan_lib::api::Spreadsheet;
use tablescan_lib::api::TableService;
use tablescan_lib::api::sanitize_file_name;
use tablescan_lib::error::Error;
use tablescan_lib::model::TaskId;
use tablescan_lib::pipeline::RecoveryConfig;
use tablescan_lib::pipeline::Stage;
use tablescan_lib::pipeline::download_with_recovery;
use tablescan_lib::pipeline::process_image;
use tablescan_lib::poll::PollConfig;
use tablescan_lib::session::TableSession;
use tokio_util::sync::CancellationToken;

use crate::cli::Cli;
use crate::cli::Command;
use crate::render;

pub async fn run(cli: Cli) -> Result<(), Error> {
    let client = cli.client()?;
    let poll = cli.poll_config();
    log::debug!("using {:?}, {:?}", client, poll);

    match cli.command {
        Command::Process { image, show } => {
            let task_id = process(&client, &poll, image).await?;
            println!("{task_id}");
            if show {
                let mut session = open_session(&client, task_id).await?;
                print_sheet(&mut session, 0)?;
            }
            Ok(())
        }
        Command::Status { task } => status(&client, TaskId::new(task)).await,
        Command::Show { task, sheet } => {
            let mut session = open_session(&client, TaskId::new(task)).await?;
            print_sheet(&mut session, sheet)
        }
        Command::Edit {
            task,
            sheet,
            row,
            col,
            text,
        } => edit(&client, TaskId::new(task), sheet, row, col, text).await,
        Command::Download { task, output } => download(&client, TaskId::new(task), output).await,
    }
}

async fn process(
    client: &TablescanClient,
    poll: &PollConfig,
    path: PathBuf,
) -> Result<TaskId, Error> {
    let image = ImageUpload::from_path(&path).await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    let task = process_image(client, &image, poll, cancel, |stage| {
        if let Stage::StartingOcr(task_id) = stage {
            eprintln!("任务 ID: {task_id}");
        }
        eprintln!("{stage}");
    })
    .await?;

    Ok(task.task_id)
}

async fn status(client: &TablescanClient, task_id: TaskId) -> Result<(), Error> {
    let task = client.get_task(&task_id).await?;

    println!("{}: {}", task.task_id, task.status);
    if let Some(message) = task.error_message.filter(|m| !m.is_empty()) {
        println!("{message}");
    }
    println!("updated {}", task.updated_at.format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}

async fn open_session(client: &TablescanClient, task_id: TaskId) -> Result<TableSession, Error> {
    let mut session = TableSession::new();
    session.set_task(task_id);
    session.fetch(client).await?;
    Ok(session)
}

fn print_sheet(session: &mut TableSession, index: usize) -> Result<(), Error> {
    let Some(document) = session.document() else {
        return Ok(());
    };
    if !document.has_data() {
        println!("(no tables recognized)");
        return Ok(());
    }
    for (i, sheet) in document.sheets.iter().enumerate() {
        let marker = if i == index { '>' } else { ' ' };
        println!("{marker} {}", render::sheet_title(i, sheet));
    }
    println!();

    session.select_sheet(index)?;
    if let Some(grid) = session.grid() {
        print!("{}", render::render_grid(&grid));
        for merge in render::render_merges(&grid) {
            println!("  {merge}");
        }
    }
    Ok(())
}

async fn edit(
    client: &TablescanClient,
    task_id: TaskId,
    sheet: usize,
    row: usize,
    col: usize,
    text: String,
) -> Result<(), Error> {
    let mut session = open_session(client, task_id).await?;
    session.select_sheet(sheet)?;
    session.begin_edit(row, col)?;
    session.set_draft(text);
    let outcome = session.commit_edit()?;

    if !outcome.is_committed() {
        println!("unchanged");
        return Ok(());
    }
    session.save(client).await?;
    println!("saved");
    print_sheet(&mut session, sheet)
}

async fn download(
    client: &TablescanClient,
    task_id: TaskId,
    output: Option<PathBuf>,
) -> Result<(), Error> {
    let file = download_with_recovery(client, &task_id, &RecoveryConfig::default()).await?;
    let path = output.unwrap_or_else(|| {
        let name = sanitize_file_name(&file.file_name)
            .unwrap_or_else(|| Spreadsheet::default_file_name(&task_id));
        PathBuf::from(name)
    });

    tokio::fs::write(&path, &file.bytes).await?;
    println!("{}", path.display());
    Ok(())
}
