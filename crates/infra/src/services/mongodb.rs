//! MongoDB service helpers
//!
//! `MongoService` → [`Database`] → [`Collection`]. Each collection operation
//! becomes one pipeline addressed to the named service.

use bson::{doc, Bson, Document};
use stitch_core::PipelineOptions;
use stitch_domain::{Result, Stage};

use crate::api::PipelineExecutor;

/// A MongoDB service configured on the app, e.g. `mdb1`.
#[derive(Debug, Clone)]
pub struct MongoService {
    executor: PipelineExecutor,
    service: String,
}

impl MongoService {
    pub fn new(executor: PipelineExecutor, service: impl Into<String>) -> Self {
        Self { executor, service: service.into() }
    }

    pub fn name(&self) -> &str {
        &self.service
    }

    pub fn db(&self, name: impl Into<String>) -> Database {
        Database { service: self.clone(), name: name.into() }
    }
}

#[derive(Debug, Clone)]
pub struct Database {
    service: MongoService,
    name: String,
}

impl Database {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection(&self, name: impl Into<String>) -> Collection {
        Collection { db: self.clone(), name: name.into() }
    }
}

/// Flags carried by an `update` stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    One,
    Many,
    Upsert,
}

#[derive(Debug, Clone)]
pub struct Collection {
    db: Database,
    name: String,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn base_args(&self) -> Document {
        doc! { "database": self.db.name.as_str(), "collection": self.name.as_str() }
    }

    fn stage(&self, action: &str, args: Document) -> Stage {
        Stage::for_service(self.db.service.service.as_str(), action, args)
    }

    async fn run(&self, stages: Vec<Stage>) -> Result<Bson> {
        self.db.service.executor.execute_pipeline(&stages, &PipelineOptions::default()).await
    }

    // Stage builders
    // -----------------------------------------------------------------

    pub fn find_stage(&self, query: Document, project: Option<Document>) -> Stage {
        let mut args = self.base_args();
        args.insert("query", query);
        if let Some(project) = project {
            args.insert("project", project);
        }
        self.stage("find", args)
    }

    /// A `literal` stage emitting `docs`, followed by the `insert` stage.
    pub fn insert_stages(&self, docs: Vec<Document>) -> Vec<Stage> {
        let items = docs.into_iter().map(Bson::Document).collect();
        vec![Stage::literal(items), self.stage("insert", self.base_args())]
    }

    pub fn update_stage(&self, query: Document, update: Document, mode: UpdateMode) -> Stage {
        let mut args = self.base_args();
        args.insert("query", query);
        args.insert("update", update);
        match mode {
            UpdateMode::One => {}
            UpdateMode::Many => {
                args.insert("multi", true);
            }
            UpdateMode::Upsert => {
                args.insert("upsert", true);
            }
        }
        self.stage("update", args)
    }

    pub fn delete_stage(&self, query: Document, single_doc: bool) -> Stage {
        let mut args = self.base_args();
        args.insert("query", query);
        args.insert("singleDoc", single_doc);
        self.stage("delete", args)
    }

    // Operations
    // -----------------------------------------------------------------

    pub async fn find(&self, query: Document, project: Option<Document>) -> Result<Bson> {
        self.run(vec![self.find_stage(query, project)]).await
    }

    pub async fn insert(&self, docs: Vec<Document>) -> Result<Bson> {
        self.run(self.insert_stages(docs)).await
    }

    pub async fn update_one(&self, query: Document, update: Document) -> Result<Bson> {
        self.run(vec![self.update_stage(query, update, UpdateMode::One)]).await
    }

    pub async fn update_many(&self, query: Document, update: Document) -> Result<Bson> {
        self.run(vec![self.update_stage(query, update, UpdateMode::Many)]).await
    }

    pub async fn upsert(&self, query: Document, update: Document) -> Result<Bson> {
        self.run(vec![self.update_stage(query, update, UpdateMode::Upsert)]).await
    }

    pub async fn delete_one(&self, query: Document) -> Result<Bson> {
        self.run(vec![self.delete_stage(query, true)]).await
    }

    pub async fn delete_many(&self, query: Document) -> Result<Bson> {
        self.run(vec![self.delete_stage(query, false)]).await
    }
}
