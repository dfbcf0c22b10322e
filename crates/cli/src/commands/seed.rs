//! Demo data seed command.
//!
//! Loads a small pet supply catalog: a two-level category tree, products
//! with weight variants, and pickup points. Inserts are keyed on natural
//! unique values (slugs, addresses), so running the command twice changes
//! nothing.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use super::CliError;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("seed data references unknown category: {0}")]
    UnknownCategory(&'static str),
}

struct SeedCategory {
    name: &'static str,
    slug: &'static str,
    parent_slug: Option<&'static str>,
    position: i32,
}

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    category_slug: &'static str,
    description: &'static str,
    /// Display price in cents. For products with variants this matches the
    /// first variant.
    price_cents: i64,
    /// Weight variants as (grams, cents), lightest first.
    variants: &'static [(i64, i64)],
}

struct SeedPickupPoint {
    city: &'static str,
    address: &'static str,
    phone: Option<&'static str>,
    position: i32,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Dogs",
        slug: "dogs",
        parent_slug: None,
        position: 0,
    },
    SeedCategory {
        name: "Cats",
        slug: "cats",
        parent_slug: None,
        position: 1,
    },
    SeedCategory {
        name: "Small pets",
        slug: "small-pets",
        parent_slug: None,
        position: 2,
    },
    SeedCategory {
        name: "Dry food",
        slug: "dog-dry-food",
        parent_slug: Some("dogs"),
        position: 0,
    },
    SeedCategory {
        name: "Wet food",
        slug: "dog-wet-food",
        parent_slug: Some("dogs"),
        position: 1,
    },
    SeedCategory {
        name: "Treats",
        slug: "dog-treats",
        parent_slug: Some("dogs"),
        position: 2,
    },
    SeedCategory {
        name: "Toys",
        slug: "dog-toys",
        parent_slug: Some("dogs"),
        position: 3,
    },
    SeedCategory {
        name: "Dry food",
        slug: "cat-dry-food",
        parent_slug: Some("cats"),
        position: 0,
    },
    SeedCategory {
        name: "Wet food",
        slug: "cat-wet-food",
        parent_slug: Some("cats"),
        position: 1,
    },
    SeedCategory {
        name: "Litter",
        slug: "cat-litter",
        parent_slug: Some("cats"),
        position: 2,
    },
    SeedCategory {
        name: "Toys",
        slug: "cat-toys",
        parent_slug: Some("cats"),
        position: 3,
    },
    SeedCategory {
        name: "Food",
        slug: "small-pet-food",
        parent_slug: Some("small-pets"),
        position: 0,
    },
    SeedCategory {
        name: "Bedding",
        slug: "small-pet-bedding",
        parent_slug: Some("small-pets"),
        position: 1,
    },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Hearty Chicken & Rice Kibble",
        slug: "hearty-chicken-rice-kibble",
        category_slug: "dog-dry-food",
        description: "Complete dry food for adult dogs of all breeds. \
                      Chicken is the first ingredient, with brown rice and \
                      vegetables for steady energy.",
        price_cents: 1190,
        variants: &[(3_000, 1190), (12_000, 3990), (20_000, 5990)],
    },
    SeedProduct {
        name: "Puppy Starter Kibble",
        slug: "puppy-starter-kibble",
        category_slug: "dog-dry-food",
        description: "Small-bite kibble for puppies up to twelve months, \
                      with added calcium and DHA.",
        price_cents: 1490,
        variants: &[(2_000, 1490), (8_000, 4690)],
    },
    SeedProduct {
        name: "Beef & Barley Stew Cans",
        slug: "beef-barley-stew-cans",
        category_slug: "dog-wet-food",
        description: "Twelve cans of slow-cooked beef stew with barley and \
                      carrots. Grain-inclusive recipe.",
        price_cents: 2390,
        variants: &[],
    },
    SeedProduct {
        name: "Peanut Butter Training Bites",
        slug: "peanut-butter-training-bites",
        category_slug: "dog-treats",
        description: "Soft low-calorie treats sized for repetition training.",
        price_cents: 690,
        variants: &[(200, 690), (500, 1290)],
    },
    SeedProduct {
        name: "Braided Rope Tug",
        slug: "braided-rope-tug",
        category_slug: "dog-toys",
        description: "Three-knot cotton rope for tug and fetch. Machine \
                      washable.",
        price_cents: 990,
        variants: &[],
    },
    SeedProduct {
        name: "Salmon Crunch Cat Food",
        slug: "salmon-crunch-cat-food",
        category_slug: "cat-dry-food",
        description: "Dry food for adult cats with salmon as the first \
                      ingredient and added taurine.",
        price_cents: 790,
        variants: &[(400, 790), (2_000, 2890), (10_000, 11900)],
    },
    SeedProduct {
        name: "Indoor Cat Formula",
        slug: "indoor-cat-formula",
        category_slug: "cat-dry-food",
        description: "Lower-calorie kibble with extra fibre for indoor cats.",
        price_cents: 890,
        variants: &[(400, 890), (2_000, 3190)],
    },
    SeedProduct {
        name: "Tuna Fillet Pouches",
        slug: "tuna-fillet-pouches",
        category_slug: "cat-wet-food",
        description: "Twelve pouches of tuna fillets in jelly. No added \
                      grain.",
        price_cents: 1590,
        variants: &[],
    },
    SeedProduct {
        name: "Clumping Clay Litter",
        slug: "clumping-clay-litter",
        category_slug: "cat-litter",
        description: "Unscented bentonite litter with fast, firm clumps.",
        price_cents: 1090,
        variants: &[(5_000, 1090), (10_000, 1890)],
    },
    SeedProduct {
        name: "Feather Teaser Wand",
        slug: "feather-teaser-wand",
        category_slug: "cat-toys",
        description: "Telescopic wand with replaceable feather lure.",
        price_cents: 590,
        variants: &[],
    },
    SeedProduct {
        name: "Timothy Hay",
        slug: "timothy-hay",
        category_slug: "small-pet-food",
        description: "First-cut timothy hay for rabbits and guinea pigs.",
        price_cents: 650,
        variants: &[(1_000, 650), (2_500, 1390)],
    },
    SeedProduct {
        name: "Paper Bedding",
        slug: "paper-bedding",
        category_slug: "small-pet-bedding",
        description: "Dust-free recycled paper bedding, unbleached.",
        price_cents: 1190,
        variants: &[],
    },
];

const PICKUP_POINTS: &[SeedPickupPoint] = &[
    SeedPickupPoint {
        city: "Springfield",
        address: "12 Market Street",
        phone: Some("+1 555 0100"),
        position: 0,
    },
    SeedPickupPoint {
        city: "Springfield",
        address: "48 Riverside Avenue",
        phone: Some("+1 555 0101"),
        position: 1,
    },
    SeedPickupPoint {
        city: "Shelbyville",
        address: "7 Old Mill Road",
        phone: None,
        position: 2,
    },
];

/// Load the demo catalog.
///
/// # Errors
///
/// Returns an error if the connection string is missing or a query fails.
pub async fn run() -> Result<(), SeedError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let categories = seed_categories(&pool).await?;
    let products = seed_products(&pool).await?;
    let pickup_points = seed_pickup_points(&pool).await?;

    tracing::info!(
        "Seed complete: {categories} categories, {products} products, {pickup_points} pickup points inserted"
    );
    Ok(())
}

/// Insert categories, parents before children. Returns how many rows were
/// actually inserted.
async fn seed_categories(pool: &PgPool) -> Result<u64, SeedError> {
    let mut inserted = 0;

    for category in CATEGORIES {
        let parent_id = match category.parent_slug {
            Some(slug) => Some(category_id_by_slug(pool, slug).await?),
            None => None,
        };

        let result = sqlx::query(
            r"
            INSERT INTO shop.categories (name, slug, parent_id, position)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(category.name)
        .bind(category.slug)
        .bind(parent_id)
        .bind(category.position)
        .execute(pool)
        .await?;

        inserted += result.rows_affected();
    }

    Ok(inserted)
}

/// Insert products and their weight variants. Returns how many products
/// were actually inserted.
async fn seed_products(pool: &PgPool) -> Result<u64, SeedError> {
    let mut inserted = 0;

    for product in PRODUCTS {
        let category_id = category_id_by_slug(pool, product.category_slug).await?;

        let result = sqlx::query(
            r"
            INSERT INTO shop.products (category_id, name, slug, description, price, in_stock)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(category_id)
        .bind(product.name)
        .bind(product.slug)
        .bind(product.description)
        .bind(cents(product.price_cents))
        .execute(pool)
        .await?;
        inserted += result.rows_affected();

        if product.variants.is_empty() {
            continue;
        }

        let product_id =
            sqlx::query_scalar::<_, i32>("SELECT id FROM shop.products WHERE slug = $1")
                .bind(product.slug)
                .fetch_one(pool)
                .await?;

        for (position, (grams, price_cents)) in product.variants.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO shop.product_variants (product_id, weight, price, position)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (product_id, weight) DO NOTHING
                ",
            )
            .bind(product_id)
            .bind(grams_to_kg(*grams))
            .bind(cents(*price_cents))
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .execute(pool)
            .await?;
        }
    }

    Ok(inserted)
}

/// Insert pickup points, skipping any address already present. Returns how
/// many rows were actually inserted.
async fn seed_pickup_points(pool: &PgPool) -> Result<u64, SeedError> {
    let mut inserted = 0;

    for point in PICKUP_POINTS {
        let result = sqlx::query(
            r"
            INSERT INTO shop.pickup_points (city, address, phone, position)
            SELECT $1, $2, $3, $4
            WHERE NOT EXISTS (
                SELECT 1 FROM shop.pickup_points WHERE city = $1 AND address = $2
            )
            ",
        )
        .bind(point.city)
        .bind(point.address)
        .bind(point.phone)
        .bind(point.position)
        .execute(pool)
        .await?;

        inserted += result.rows_affected();
    }

    Ok(inserted)
}

async fn category_id_by_slug(pool: &PgPool, slug: &'static str) -> Result<i32, SeedError> {
    sqlx::query_scalar::<_, i32>("SELECT id FROM shop.categories WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or(SeedError::UnknownCategory(slug))
}

/// Money stored as integer cents in the seed tables.
fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

/// Weights stored as integer grams in the seed tables.
fn grams_to_kg(value: i64) -> Decimal {
    Decimal::new(value, 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents_to_decimal() {
        assert_eq!(cents(1190).to_string(), "11.90");
        assert_eq!(grams_to_kg(400).to_string(), "0.400");
    }

    #[test]
    fn test_seed_products_reference_seed_categories() {
        for product in PRODUCTS {
            assert!(
                CATEGORIES
                    .iter()
                    .any(|c| c.slug == product.category_slug && c.parent_slug.is_some()),
                "{} must sit in a child category",
                product.slug
            );
        }
    }

    #[test]
    fn test_seed_display_price_matches_first_variant() {
        for product in PRODUCTS {
            if let Some((_, first_price)) = product.variants.first() {
                assert_eq!(
                    product.price_cents, *first_price,
                    "{} display price must match its first variant",
                    product.slug
                );
            }
        }
    }

    #[test]
    fn test_seed_variants_sorted_and_unique() {
        for product in PRODUCTS {
            let weights: Vec<i64> = product.variants.iter().map(|(g, _)| *g).collect();
            let mut sorted = weights.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(weights, sorted, "{} variants must be unique, lightest first", product.slug);
        }
    }
}
