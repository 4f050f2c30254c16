//! Baseline demonstration dataset inserted after a reset.

use sqlx::PgConnection;
use hub_core::idea::{IdeaType, Priority, TargetGroup};
use hub_core::types::DbId;
use hub_core::validation::dedup_tag_names;

struct SeedUser {
    email: &'static str,
    name: &'static str,
    department: Option<&'static str>,
}

struct SeedCategory {
    name: &'static str,
    description: &'static str,
    color: &'static str,
}

struct SeedIdea {
    title: &'static str,
    description: &'static str,
    idea_type: IdeaType,
    priority: Priority,
    target_group: TargetGroup,
    /// Index into [`USERS`].
    submitter: usize,
    /// Index into [`CATEGORIES`].
    category: usize,
    tags: &'static [&'static str],
}

const USERS: &[SeedUser] = &[
    SeedUser {
        email: "anna.lindqvist@kommun.se",
        name: "Anna Lindqvist",
        department: Some("Stadsbyggnadskontoret"),
    },
    SeedUser {
        email: "erik.johansson@kommun.se",
        name: "Erik Johansson",
        department: Some("IT-avdelningen"),
    },
    SeedUser {
        email: "maria.svensson@example.com",
        name: "Maria Svensson",
        department: None,
    },
];

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Digitalisering",
        description: "Digitala tjänster och e-förvaltning",
        color: "#3498db",
    },
    SeedCategory {
        name: "Miljö och hållbarhet",
        description: "Klimat, energi och naturvård",
        color: "#27ae60",
    },
    SeedCategory {
        name: "Trafik och infrastruktur",
        description: "Gator, kollektivtrafik och cykelvägar",
        color: "#e67e22",
    },
    SeedCategory {
        name: "Skola och omsorg",
        description: "Utbildning, äldreomsorg och socialtjänst",
        color: "#9b59b6",
    },
];

const IDEAS: &[SeedIdea] = &[
    SeedIdea {
        title: "Digital felanmälan för gatubelysning",
        description: "Invånare ska kunna rapportera trasig gatubelysning via en app med kartfunktion och få återkoppling när felet är åtgärdat.",
        idea_type: IdeaType::Idea,
        priority: Priority::High,
        target_group: TargetGroup::Citizens,
        submitter: 2,
        category: 0,
        tags: &["app", "felanmälan", "belysning"],
    },
    SeedIdea {
        title: "Fler laddstolpar vid kommunens parkeringar",
        description: "Det saknas laddplatser för elbilar vid kommunhuset och idrottsanläggningarna, vilket gör det svårt att välja en elbil.",
        idea_type: IdeaType::Need,
        priority: Priority::Medium,
        target_group: TargetGroup::Citizens,
        submitter: 0,
        category: 1,
        tags: &["elbil", "parkering"],
    },
    SeedIdea {
        title: "Långa handläggningstider för bygglov",
        description: "Företag väntar ofta flera månader på bygglovsbeslut. En digital ansökan med automatisk kontroll av kompletta handlingar skulle korta ledtiden.",
        idea_type: IdeaType::Problem,
        priority: Priority::High,
        target_group: TargetGroup::Businesses,
        submitter: 0,
        category: 0,
        tags: &["bygglov", "e-tjänst"],
    },
    SeedIdea {
        title: "Säkrare cykelväg till skolan",
        description: "Cykelvägen längs Skolgatan korsar två trafikerade vägar utan övergångsställe. Barn som cyklar till skolan behöver en säkrare väg.",
        idea_type: IdeaType::Improvement,
        priority: Priority::Medium,
        target_group: TargetGroup::Citizens,
        submitter: 2,
        category: 2,
        tags: &["cykel", "trafiksäkerhet", "skola"],
    },
    SeedIdea {
        title: "Gemensam schemaläggning i hemtjänsten",
        description: "Hemtjänstens personal planerar besök i flera olika system. Ett gemensamt schemaverktyg skulle minska dubbelarbete och missade besök.",
        idea_type: IdeaType::Improvement,
        priority: Priority::Low,
        target_group: TargetGroup::Employees,
        submitter: 1,
        category: 3,
        tags: &["schemaläggning", "hemtjänst", "app"],
    },
];

/// Insert the baseline users, categories, tags and ideas.
///
/// Expects empty tables. No votes or comments are created.
pub async fn create_seed_data(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    let mut user_ids = Vec::with_capacity(USERS.len());
    for user in USERS {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO users (email, name, department) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user.email)
        .bind(user.name)
        .bind(user.department)
        .fetch_one(&mut *conn)
        .await?;
        user_ids.push(id);
    }

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for category in CATEGORIES {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO categories (name, description, color) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(category.name)
        .bind(category.description)
        .bind(category.color)
        .fetch_one(&mut *conn)
        .await?;
        category_ids.push(id);
    }

    for idea in IDEAS {
        let idea_id: DbId = sqlx::query_scalar(
            "INSERT INTO ideas \
                (title, description, type, priority, target_group, submitter_id, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id",
        )
        .bind(idea.title)
        .bind(idea.description)
        .bind(idea.idea_type)
        .bind(idea.priority)
        .bind(idea.target_group)
        .bind(user_ids[idea.submitter])
        .bind(category_ids[idea.category])
        .fetch_one(&mut *conn)
        .await?;

        let names: Vec<String> = idea.tags.iter().map(|t| t.to_string()).collect();
        for name in dedup_tag_names(&names) {
            let tag_id: DbId = sqlx::query_scalar(
                "INSERT INTO tags (name) VALUES ($1) \
                 ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
                 RETURNING id",
            )
            .bind(&name)
            .fetch_one(&mut *conn)
            .await?;
            sqlx::query("INSERT INTO idea_tags (idea_id, tag_id) VALUES ($1, $2)")
                .bind(idea_id)
                .bind(tag_id)
                .execute(&mut *conn)
                .await?;
        }
    }

    tracing::info!(
        users = USERS.len(),
        categories = CATEGORIES.len(),
        ideas = IDEAS.len(),
        "Seed data created",
    );
    Ok(())
}

/// Number of ideas in the baseline dataset.
pub const SEED_IDEA_COUNT: usize = IDEAS.len();
