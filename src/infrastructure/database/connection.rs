// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::DatabaseSettings;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use std::time::Duration;

/// 创建数据库连接池
///
/// # 参数
///
/// * `settings` - 数据库配置
///
/// # 返回值
///
/// * `Ok(DatabaseConnection)` - 数据库连接
/// * `Err(DbErr)` - 连接过程中出现的错误
pub async fn create_pool(settings: &DatabaseSettings) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(settings.url.to_owned());

    if let Some(max) = settings.max_connections {
        opt.max_connections(max);
    }

    if let Some(min) = settings.min_connections {
        opt.min_connections(min);
    }

    if let Some(timeout) = settings.connect_timeout {
        opt.connect_timeout(Duration::from_secs(timeout));
        opt.acquire_timeout(Duration::from_secs(timeout));
    }

    if let Some(idle) = settings.idle_timeout {
        opt.idle_timeout(Duration::from_secs(idle));
    }

    opt.max_lifetime(Duration::from_secs(settings.max_lifetime))
        .sqlx_logging(settings.sqlx_logging);

    let connection = Database::connect(opt).await?;
    tracing::info!(
        backend = ?connection.get_database_backend(),
        "Database connection pool created"
    );
    Ok(connection)
}

/// 关闭数据库连接池
///
/// 只有在持有最后一个引用时才会主动关闭；
/// 仍有其它持有者时仅释放当前引用，连接池随最后一个持有者一起释放。
pub async fn close_pool(db: Arc<DatabaseConnection>) -> Result<(), DbErr> {
    match Arc::try_unwrap(db) {
        Ok(connection) => {
            connection.close().await?;
            tracing::info!("Database connection pool closed");
        }
        Err(shared) => {
            tracing::warn!(
                holders = Arc::strong_count(&shared),
                "Database connection pool still shared, skipping explicit close"
            );
        }
    }
    Ok(())
}
