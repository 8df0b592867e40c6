//! 进程生命周期：启动准备与优雅退出

pub mod shutdown;
pub mod startup;
