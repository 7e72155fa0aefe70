//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `cookbook_core` linkage without the Flutter runtime.
//! - Print the visible recipe list for a database file.
//!
//! Usage: `cookbook_cli [db_path] [query] [category]`

use cookbook_core::{
    normalize_category_input, RecipeListController, RecipeRepository, SqliteRecipeStore,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("cookbook_core ping={}", cookbook_core::ping());
    println!("cookbook_core version={}", cookbook_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        return ExitCode::SUCCESS;
    };
    let query = args.next().unwrap_or_default();
    let category = normalize_category_input(args.next().unwrap_or_default().as_str());

    let store = match SqliteRecipeStore::open(&db_path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open {db_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut controller = RecipeListController::load(RecipeRepository::new(store));
    controller.set_category(category);
    controller.set_search_text(query);

    println!(
        "recipes visible={} total={} category={}",
        controller.visible_recipes().len(),
        controller.all_recipes().len(),
        controller.selected_category()
    );
    for (index, recipe) in controller.visible_recipes().iter().enumerate() {
        println!(
            "{index}\t{}\t{}\t{}",
            recipe.category,
            recipe.updated_at,
            recipe.display_title()
        );
    }
    ExitCode::SUCCESS
}
