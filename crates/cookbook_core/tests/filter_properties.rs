use cookbook_core::{filter, Recipe, CATEGORIES};

fn corpus() -> Vec<Recipe> {
    let mut recipes = vec![
        Recipe::new("Omelette", "Meal").with_ingredients("Eggs, Butter"),
        Recipe::new("Brownie", "Dessert").with_ingredients("cocoa, eggs"),
        Recipe::new("Chips", "Snack").with_ingredients("potatoes"),
        Recipe::new("Egg Tart", "Dessert"),
        Recipe::new("Ramen", "meal").with_ingredients("noodles, EGG"),
        Recipe::new("", "Snack").with_ingredients("popcorn"),
    ];
    let mut untitled = Recipe::new("", "Meal");
    untitled.title = None;
    recipes.push(untitled);
    recipes
}

const QUERIES: [&str; 7] = ["", "egg", "EGG", "om", "pop", "zz", "s"];

fn contains_ci(field: Option<&str>, query: &str) -> bool {
    field
        .map(|value| value.to_lowercase().contains(&query.to_lowercase()))
        .unwrap_or(false)
}

#[test]
fn category_filter_is_sound_complete_and_ordered() {
    let all = corpus();
    for category in CATEGORIES.iter().filter(|category| **category != "All") {
        let result = filter(&all, "", category);
        let expected = all
            .iter()
            .filter(|recipe| recipe.category == *category)
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(result, expected, "category {category}");
    }
}

#[test]
fn sentinel_category_with_empty_query_is_identity() {
    let all = corpus();
    assert_eq!(filter(&all, "", "All"), all);
}

#[test]
fn query_keeps_exactly_title_or_ingredient_matches() {
    let all = corpus();
    for query in QUERIES {
        let result = filter(&all, query, "All");
        let expected = all
            .iter()
            .filter(|recipe| {
                query.is_empty()
                    || contains_ci(recipe.title.as_deref(), query)
                    || contains_ci(recipe.ingredients.as_deref(), query)
            })
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(result, expected, "query {query:?}");
    }
}

#[test]
fn filter_is_idempotent_for_all_inputs() {
    let all = corpus();
    for category in CATEGORIES {
        for query in QUERIES {
            let once = filter(&all, query, category);
            assert_eq!(filter(&once, query, category), once);
        }
    }
}

#[test]
fn lowercase_tag_is_not_the_meal_category() {
    let all = corpus();
    let meals = filter(&all, "", "Meal");
    assert!(meals.iter().all(|recipe| recipe.category == "Meal"));
    assert!(!meals.iter().any(|recipe| recipe.display_title() == "Ramen"));
}
