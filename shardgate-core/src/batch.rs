use crate::error::BatchError;
use crate::model::OperationDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Batch<T = OperationDescriptor> {
    pub index: usize,
    pub operations: Vec<T>,
}

/// Greedy fixed-size chunking.
///
/// Items accumulate into the current batch, which is closed when it holds
/// `max_batch_size` items or the item is the last one. Order is preserved
/// within and across batches; every batch but the last is full, and no
/// batch is empty.
pub fn partition<T>(items: Vec<T>, max_batch_size: usize) -> Result<Vec<Batch<T>>, BatchError> {
    if max_batch_size == 0 {
        return Err(BatchError::ZeroBatchSize);
    }

    let total = items.len();
    let mut batches = Vec::with_capacity(total.div_ceil(max_batch_size));
    let mut current = Vec::with_capacity(max_batch_size.min(total));

    for (i, item) in items.into_iter().enumerate() {
        current.push(item);
        let is_last = i + 1 == total;
        if current.len() >= max_batch_size || is_last {
            batches.push(Batch {
                index: batches.len(),
                operations: std::mem::take(&mut current),
            });
        }
    }

    Ok(batches)
}
