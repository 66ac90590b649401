use log::info;
use mongodb::bson::doc;
use mongodb::{Client, Database as MongoDatabase, options::ClientOptions};

use crate::config::AppConfig;

/// Owned MongoDB handle. Built once in `main`, cloned into the stores, shut down on exit.
pub struct Database {
    pub client: Client,
    database_name: String,
}

impl Database {
    pub async fn init(config: &AppConfig) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
        client_options.app_name = Some("social_feed".to_string());

        let client = Client::with_options(client_options)?;

        // Ping the server to see if you can connect to the cluster
        client.database("admin").run_command(doc! {"ping": 1}).await?;

        info!("Connected successfully to MongoDB");

        Ok(Self {
            client,
            database_name: config.database_name.clone(),
        })
    }

    pub fn database(&self) -> MongoDatabase {
        self.client.database(&self.database_name)
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB client shut down");
    }
}
