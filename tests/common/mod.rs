#![allow(dead_code)]

use chrono::{Duration, Utc};
use quickbite_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    domain::StatusPolicy,
    entity::{
        food_items::{ActiveModel as FoodActive, Model as FoodModel},
        restaurants::{ActiveModel as RestaurantActive, Model as RestaurantModel},
        users::ActiveModel as UserActive,
    },
    middleware::auth::{Role, issue_token},
    state::AppState,
};
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

/// Fresh in-memory database with every migration applied.
pub async fn test_state(status_policy: StatusPolicy) -> anyhow::Result<AppState> {
    state_for("sqlite::memory:".to_string(), status_policy).await
}

/// State on the PostgreSQL database named by `TEST_DATABASE_URL`, or `None`
/// when it is not set.
pub async fn postgres_state() -> anyhow::Result<Option<AppState>> {
    match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => Ok(Some(state_for(url, StatusPolicy::Strict).await?)),
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL to run it against PostgreSQL.");
            Ok(None)
        }
    }
}

async fn state_for(database_url: String, status_policy: StatusPolicy) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    Ok(AppState {
        orm,
        config: AppConfig {
            database_url,
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: JWT_SECRET.into(),
            status_policy,
        },
    })
}

pub async fn create_user(
    state: &AppState,
    name: &str,
    email: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        email: Set(email.into()),
        role: Set(role.as_str().into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(user.id)
}

pub async fn create_restaurant(state: &AppState, name: &str) -> anyhow::Result<RestaurantModel> {
    let now = Utc::now();
    let restaurant = RestaurantActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        image: Set(String::new()),
        description: Set(format!("{name} test kitchen")),
        address: Set("1 Test Road".into()),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(restaurant)
}

pub async fn create_food(
    state: &AppState,
    restaurant_id: Uuid,
    name: &str,
    price: i64,
) -> anyhow::Result<FoodModel> {
    let now = Utc::now();
    let food = FoodActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(restaurant_id),
        name: Set(name.into()),
        image: Set(String::new()),
        price: Set(price),
        category: Set("Mains".into()),
        is_available: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(food)
}

pub fn bearer(user_id: Uuid, role: Role) -> String {
    let token = issue_token(JWT_SECRET, user_id, role, Duration::minutes(10))
        .expect("token should be issued");
    format!("Bearer {token}")
}
