//! Order Repository
//!
//! 订单创建走 OrderProcessor 的事务，这里只负责查询。
//! user 引用以 "user:id" 字符串存储，列表的用户信息在
//! Rust 侧补齐。

use std::collections::HashMap;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{parse_id, BaseRepository, RepoError, RepoResult, UserRepository};
use crate::db::models::{Order, OrderWithUser, UserId};

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Order> {
        let record = parse_id("order", id)?;
        let order: Option<Order> = self.base.db().select(record).await?;
        order.ok_or_else(|| RepoError::NotFound(format!("Order not found: {id}")))
    }

    /// List orders newest first, with the ordering user's name and address
    ///
    /// `user` 为 Some 时只返回该用户自己的订单 (非管理员视图)。
    pub async fn find_all_with_users(
        &self,
        user: Option<&UserId>,
    ) -> RepoResult<Vec<OrderWithUser>> {
        let orders: Vec<Order> = match user {
            Some(user_id) => {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM order WHERE user = $user ORDER BY ordered_at DESC")
                    .bind(("user", user_id.to_string()))
                    .await?;
                result.take(0)?
            }
            None => {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM order ORDER BY ordered_at DESC")
                    .await?;
                result.take(0)?
            }
        };

        let mut user_ids: Vec<UserId> = Vec::new();
        for order in &orders {
            if !user_ids.contains(&order.user) {
                user_ids.push(order.user.clone());
            }
        }
        let users = UserRepository::new(self.base.db().clone())
            .find_many(&user_ids)
            .await?;
        let by_id: HashMap<String, _> = users
            .into_iter()
            .filter_map(|u| u.id.clone().map(|id| (id.to_string(), u)))
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| {
                let user = by_id.get(&order.user.to_string());
                OrderWithUser {
                    user_name: user.map(|u| u.name.clone()),
                    user_address: user.and_then(|u| u.address.clone()),
                    order,
                }
            })
            .collect())
    }
}
