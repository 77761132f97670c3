/// Opens storage transactions. Every multi-step service operation runs inside one.
#[async_trait::async_trait]
pub trait TxManager: Send + Sync {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>>;
}

/// A live transaction. Dropping it without `commit` discards every write.
#[async_trait::async_trait]
pub trait StorageTx<'t>: Send {
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}

/// How a row that is about to be modified should be read.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ReadMode {
    Plain,
    /// Lock the row until the transaction ends (`SELECT ... FOR UPDATE`).
    ForUpdate,
}
