use chrono::{Duration, Utc};
use quickbite_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        Restaurants, Users,
        food_items::ActiveModel as FoodActive,
        restaurants::{ActiveModel as RestaurantActive, Column as RestaurantCol},
        users::{ActiveModel as UserActive, Column as UserCol},
    },
    middleware::auth::{Role, issue_token},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

struct Menu {
    name: &'static str,
    description: &'static str,
    address: &'static str,
    image: &'static str,
    foods: &'static [(&'static str, &'static str, i64)],
}

const MENUS: &[Menu] = &[
    Menu {
        name: "Pizza Palace",
        description: "Wood-fired pizza and fresh pasta",
        address: "12 Oven Street",
        image: "/images/pizza-palace.jpg",
        foods: &[
            ("Margherita", "Pizza", 899),
            ("Pepperoni", "Pizza", 1099),
            ("Spaghetti Carbonara", "Pasta", 1249),
            ("Tiramisu", "Dessert", 599),
        ],
    },
    Menu {
        name: "Burger Barn",
        description: "Smash burgers, fries and shakes",
        address: "3 Grill Lane",
        image: "/images/burger-barn.jpg",
        foods: &[
            ("Classic Smash", "Burgers", 949),
            ("Double Bacon", "Burgers", 1299),
            ("Loaded Fries", "Sides", 499),
            ("Vanilla Shake", "Drinks", 450),
        ],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "QuickBite Admin", "admin@quickbite.com", Role::Admin).await?;
    let user_id = ensure_user(&orm, "Demo Customer", "user@quickbite.com", Role::User).await?;
    seed_catalog(&orm).await?;

    let ttl = Duration::days(7);
    let admin_token = issue_token(&config.jwt_secret, admin_id, Role::Admin, ttl)?;
    let user_token = issue_token(&config.jwt_secret, user_id, Role::User, ttl)?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    println!("Admin token: Bearer {admin_token}");
    println!("User token:  Bearer {user_token}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    name: &str,
    email: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        role: Set(role.as_str().to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={})", role.as_str());
    Ok(user.id)
}

async fn seed_catalog(orm: &DatabaseConnection) -> anyhow::Result<()> {
    for menu in MENUS {
        let exists = Restaurants::find()
            .filter(RestaurantCol::Name.eq(menu.name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            println!("Restaurant {} already present", menu.name);
            continue;
        }

        let now = Utc::now();
        let restaurant = RestaurantActive {
            id: Set(Uuid::new_v4()),
            name: Set(menu.name.to_string()),
            image: Set(menu.image.to_string()),
            description: Set(menu.description.to_string()),
            address: Set(menu.address.to_string()),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(orm)
        .await?;

        for (name, category, price) in menu.foods {
            FoodActive {
                id: Set(Uuid::new_v4()),
                restaurant_id: Set(restaurant.id),
                name: Set(name.to_string()),
                image: Set(String::new()),
                price: Set(*price),
                category: Set(category.to_string()),
                is_available: Set(true),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(orm)
            .await?;
        }
        println!("Seeded {} with {} items", menu.name, menu.foods.len());
    }
    Ok(())
}
