//! Shared fixtures for integration tests.

use stackform::{HealthCheck, ServiceRecord};

/// A two-tier stack: an nginx front end and a postgres database, with
/// the front end depending on the database.
#[must_use]
pub fn sample_stack() -> Vec<ServiceRecord> {
    let mut web = ServiceRecord::new("web", "nginx:alpine");
    web.host_port = "8080".to_string();
    web.container_port = "80".to_string();
    web.environment = vec!["MODE=prod".to_string()];
    web.depends_on = vec!["db".to_string()];
    web.networks = vec!["frontend".to_string(), "backend".to_string()];

    let mut db = ServiceRecord::new("db", "postgres:13");
    db.host_port = "5432".to_string();
    db.container_port = "5432".to_string();
    db.environment = vec![
        "POSTGRES_DB=app".to_string(),
        "POSTGRES_USER=admin".to_string(),
    ];
    db.volumes = vec!["./data:/var/lib/postgresql/data".to_string()];
    db.health_check = HealthCheck {
        enabled: true,
        ..HealthCheck::default()
    };
    db.resources.memory_limit = 512;
    db.networks = vec!["backend".to_string()];

    vec![web, db]
}
