use anyhow::{bail, Result};
use kotoba_core::{ContentKind, LevelFilter, SortDirection, SortKey};
use kotoba_service::StudyApp;

pub(crate) struct ListArgs {
    pub kind: ContentKind,
    pub search: String,
    pub level: LevelFilter,
    pub sort: SortKey,
    pub desc: bool,
    pub page: usize,
    pub refresh: bool,
}

pub(crate) async fn run_list(app: &StudyApp, args: ListArgs) -> Result<()> {
    let controller = app.controller(args.kind);
    controller.set_search(args.search);
    controller.set_level(args.level);
    controller.set_sort(args.sort);
    controller.set_direction(if args.desc { SortDirection::Desc } else { SortDirection::Asc });
    controller.set_page(args.page);

    let view = if args.refresh { controller.refresh().await } else { controller.load().await };
    println!("{}", serde_json::to_string_pretty(&view)?);

    if let Some(error) = view.error {
        bail!("failed to load {} list: {error}", args.kind);
    }
    Ok(())
}
