use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

use crate::jobs::repo::ensure_tags;

/// Technology names offered by tag autocomplete.
pub const TECH_LIST: &[&str] = &[
    // Languages
    "Python", "JavaScript", "TypeScript", "Java", "C#", "C++", "Go", "Rust",
    "PHP", "Ruby", "Swift", "Kotlin", "Dart", "SQL", "Shell Script",
    // Backend frameworks
    "Django", "Flask", "FastAPI", "Node.js", "Express", "NestJS",
    "Spring Boot", "ASP.NET Core", "Laravel", "Ruby on Rails", "Elixir Phoenix",
    // Frontend frameworks
    "React", "Vue.js", "Angular", "Next.js", "Svelte", "Nuxt.js",
    "Remix", "Astro", "jQuery",
    // Mobile
    "Flutter", "React Native", "Android SDK", "iOS (SwiftUI)", "Ionic",
    // Databases
    "PostgreSQL", "MySQL", "MongoDB", "Redis", "SQLite", "Oracle",
    "Microsoft SQL Server", "Cassandra", "DynamoDB", "Firebase",
    // DevOps and cloud
    "Docker", "Kubernetes", "AWS", "Azure", "Google Cloud (GCP)",
    "Terraform", "Ansible", "Jenkins", "GitHub Actions", "GitLab CI",
    "Nginx", "Prometheus", "Grafana",
    // Tooling and practices
    "Git", "Linux", "API REST", "GraphQL", "WebSockets", "Unit Testing",
    "TDD", "Clean Code", "Microservices", "Serverless", "OAuth 2.0", "JWT",
    // CSS and UI/UX
    "Tailwind CSS", "Bootstrap", "Sass", "Figma", "Adobe XD",
    "Material UI", "Chakra UI", "Styled Components",
    // Data science and AI
    "Pandas", "NumPy", "Scikit-learn", "TensorFlow", "PyTorch", "Keras",
    "Jupyter Notebook", "OpenAI API", "LangChain",
    // Other
    "Selenium", "Cypress", "Playwright", "Postman", "Swagger",
    "Jira", "Scrum", "Kanban",
];

/// Registers every entry of [`TECH_LIST`] as a tag. Safe to repeat; returns
/// the number of tags that did not exist yet.
pub async fn load_techs(pool: &SqlitePool) -> Result<usize> {
    let mut conn = pool.acquire().await?;
    let created = ensure_tags(&mut conn, TECH_LIST).await?;
    info!("{} technologies processed", TECH_LIST.len());
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use std::collections::HashSet;

    #[test]
    fn tech_list_has_no_duplicates() {
        let unique: HashSet<_> = TECH_LIST.iter().collect();
        assert_eq!(unique.len(), TECH_LIST.len());
    }

    #[tokio::test]
    async fn loading_twice_creates_nothing_the_second_time() {
        let pool = test_pool().await;

        assert_eq!(load_techs(&pool).await.unwrap(), TECH_LIST.len());
        assert_eq!(load_techs(&pool).await.unwrap(), 0);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, TECH_LIST.len() as i64);
    }
}
