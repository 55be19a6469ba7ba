//! A connection view whose domains are exposed as projects.

use super::project::Project;
use crate::errors::ClientError;
use crate::resources::Connection;

#[derive(Debug)]
pub struct ConnectionAdapter {
    connection: Connection,
    projects: Option<Vec<Project>>,
}

impl ConnectionAdapter {
    pub fn new(connection: Connection) -> Self {
        Self {
            connection,
            projects: None,
        }
    }

    /// The broker URL.
    pub fn name(&self) -> &str {
        self.connection.server_url()
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }

    /// Projects for every domain, adapted on first access.
    pub fn projects(&mut self) -> Result<&mut [Project], ClientError> {
        if self.projects.is_none() {
            let domains = self.connection.domains()?.handles();
            self.projects = Some(domains.into_iter().map(Project::new).collect());
        }
        Ok(self.projects.as_deref_mut().unwrap_or_default())
    }

    pub fn project(&mut self, name: &str) -> Result<Option<&mut Project>, ClientError> {
        Ok(self.projects()?.iter_mut().find(|p| p.name() == name))
    }

    /// Refresh the connection and rebuild projects on next access.
    pub fn refresh(&mut self) -> Result<(), ClientError> {
        self.connection.refresh()?;
        self.projects = None;
        Ok(())
    }
}
