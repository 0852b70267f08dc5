pub(crate) mod deferred_task;
