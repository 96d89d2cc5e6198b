// 行列型と作業アイテム定義
// パイプラインの外部コラボレータ（生成・変換・出力）の実体

use rand::Rng;
use std::fmt;
use std::time::Duration;

/// 行優先で格納されたi64行列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl Matrix {
    /// 要素を指定して行列を作成
    ///
    /// `data` は行優先で `rows * cols` 要素でなければならない。
    pub fn from_data(rows: usize, cols: usize, data: Vec<i64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// 小さな乱数値（-9..=9）で埋めた行列を生成
    pub fn generate(rows: usize, cols: usize) -> Self {
        let mut rng = rand::thread_rng();
        let data = (0..rows * cols).map(|_| rng.gen_range(-9..=9)).collect();
        Self { rows, cols, data }
    }

    /// 行数
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// 列数
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// 要素を取得（行・列は0始まり）
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.data[row * self.cols + col]
    }

    /// 素朴な三重ループによる行列積
    ///
    /// 形状の整合（self.cols == other.rows）は生成側が保証する。
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        debug_assert_eq!(self.cols, other.rows);

        let mut data = vec![0i64; self.rows * other.cols];
        for i in 0..self.rows {
            for k in 0..self.cols {
                let left = self.data[i * self.cols + k];
                for j in 0..other.cols {
                    data[i * other.cols + j] += left * other.data[k * other.cols + j];
                }
            }
        }

        Matrix {
            rows: self.rows,
            cols: other.cols,
            data,
        }
    }
}

impl fmt::Display for Matrix {
    /// 1行を空白区切り、行ごとに改行で整形する
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.get(row, col))?;
            }
            if row + 1 < self.rows {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// 作業アイテム: 掛け合わせる同形状の行列ペア
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixPair {
    pub left: Matrix,
    pub right: Matrix,
}

impl MatrixPair {
    /// size × size の乱数行列ペアを生成
    pub fn generate(size: usize) -> Self {
        Self {
            left: Matrix::generate(size, size),
            right: Matrix::generate(size, size),
        }
    }

    /// ペアの積を計算
    pub fn product(&self) -> Matrix {
        self.left.multiply(&self.right)
    }
}

/// パイプライン1回分の実行サマリー
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// 生産された作業アイテム数
    pub produced: usize,
    /// 変換された作業アイテム数
    pub consumed: usize,
    /// シンクが出力した結果数
    pub emitted: usize,
    /// 実行時間
    pub elapsed: Duration,
}
